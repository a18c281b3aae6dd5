//! Commit 分类核心实现
//!
//! 给定参考时间和作者白名单，为每个 Commit 计算匹配状态：
//! - 时间无法解析或晚于参考时间 → `None` (不出现在结果中)
//! - 作者不在白名单 → `Lesser`
//! - 白名单作者且时间恰好等于参考时间 → `Exact`
//! - 白名单作者且早于参考时间 → `Trusted`

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CommitId, CommitRecord};
use crate::rules::RuleMatcher;

/// 匹配状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// 未匹配
    None,
    /// 恰好是参考时间的 Commit
    Exact,
    /// 白名单作者，早于参考时间
    Trusted,
    /// 非白名单作者 (可能来自上游)
    Lesser,
}

impl MatchStatus {
    pub fn is_matched(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// 高亮使用的 CSS class
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Exact => Some("CommitLog-item--fch-exact"),
            Self::Trusted => Some("CommitLog-item--fch-lightedUp"),
            Self::Lesser => Some("CommitLog-item--fch-lesser"),
        }
    }
}

/// 参考时间边界策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// `<=` 视为匹配，`==` 视为 Exact
    #[default]
    Inclusive,
    /// 只有严格早于参考时间才匹配，不会产生 Exact
    Exclusive,
}

impl BoundaryPolicy {
    fn includes(&self, time: DateTime<Utc>, reference: DateTime<Utc>) -> bool {
        match self {
            Self::Inclusive => time <= reference,
            Self::Exclusive => time < reference,
        }
    }
}

/// 分类结果
///
/// `statuses` 只包含匹配的 Commit；`order` 按输入顺序记录匹配的 Commit。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    statuses: HashMap<CommitId, MatchStatus>,
    order: Vec<CommitId>,
}

impl Classification {
    /// 查询某个 Commit 的状态，未匹配返回 `MatchStatus::None`
    pub fn status(&self, id: &CommitId) -> MatchStatus {
        self.statuses.get(id).copied().unwrap_or(MatchStatus::None)
    }

    /// 输入顺序中第一个匹配的 Commit
    pub fn first_match(&self) -> Option<&CommitId> {
        self.order.first()
    }

    /// 按输入顺序迭代匹配结果
    pub fn iter(&self) -> impl Iterator<Item = (&CommitId, MatchStatus)> + '_ {
        self.order.iter().map(move |id| (id, self.status(id)))
    }

    pub fn as_map(&self) -> &HashMap<CommitId, MatchStatus> {
        &self.statuses
    }

    /// 匹配数量
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 指定状态的数量
    pub fn count(&self, status: MatchStatus) -> usize {
        self.statuses.values().filter(|s| **s == status).count()
    }
}

/// 单个 Commit 的分类
///
/// 纯函数，不依赖任何外部状态。
pub fn classify_one(
    commit: &CommitRecord,
    reference: DateTime<Utc>,
    allowlist: &RuleMatcher,
    policy: BoundaryPolicy,
) -> MatchStatus {
    let Some(time) = commit.committed_at else {
        return MatchStatus::None;
    };

    if !policy.includes(time, reference) {
        return MatchStatus::None;
    }

    if !allowlist.is_match(&commit.author_email) {
        return MatchStatus::Lesser;
    }

    if time == reference {
        MatchStatus::Exact
    } else {
        MatchStatus::Trusted
    }
}

/// 对一批 Commit 分类
///
/// 同一批次中重复的标识只保留第一次出现。
///
/// # Arguments
/// * `commits` - 页面当前显示的 Commit (按页面顺序)
/// * `reference` - 参考时间
/// * `allowlist` - 作者白名单
/// * `policy` - 边界策略
pub fn classify(
    commits: &[CommitRecord],
    reference: DateTime<Utc>,
    allowlist: &RuleMatcher,
    policy: BoundaryPolicy,
) -> Classification {
    let mut result = Classification::default();

    for commit in commits {
        if result.statuses.contains_key(&commit.id) {
            continue;
        }
        let status = classify_one(commit, reference, allowlist, policy);
        if status.is_matched() {
            result.statuses.insert(commit.id.clone(), status);
            result.order.push(commit.id.clone());
        }
    }

    result
}
