//! 批量导入启发式
//!
//! 源码树批量导入产生的 Commit 往往在同一秒内连续生成。以其中一个为参考点时，
//! 同批次的兄弟 Commit 可能因为秒级精度被判为晚于参考点，因此建议把参考时间后移一个安全余量。

use chrono::{DateTime, TimeDelta, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::rules::{PatternRule, RuleError, RuleMatcher};

/// 默认安全余量 (分钟)
pub const DEFAULT_IMPORT_MARGIN_MINUTES: i64 = 5;

/// 安全余量上限 (一周)
pub const MAX_IMPORT_MARGIN_MINUTES: i64 = 7 * 24 * 60;

/// 已知的批量导入身份
pub static IMPORT_IDENTITIES: &[&str] = &["initial-contribution@android.com"];

/// 已知的导入消息模式
pub static IMPORT_MESSAGE_PATTERNS: Lazy<Vec<PatternRule>> = Lazy::new(|| {
    vec![
        PatternRule::prefix("Perforce auto import", "auto import from //"),
        PatternRule::prefix("Perforce code drop", "Code drop from //"),
        PatternRule::prefix("Initial contribution", "Initial Contribution"),
        PatternRule::substring("SVN import", "git-svn-id:"),
    ]
});

/// 参考时间调整建议
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportAdjustment {
    pub original: DateTime<Utc>,
    pub adjusted: DateTime<Utc>,
    /// 命中的消息模式名称
    pub reason: String,
}

/// 批量导入检测
#[derive(Debug, Clone)]
pub struct ImportHeuristic {
    identities: Vec<String>,
    messages: RuleMatcher,
    margin: TimeDelta,
}

impl ImportHeuristic {
    /// 使用内置身份和消息模式创建
    ///
    /// # Errors
    /// 余量为负数或超过 `MAX_IMPORT_MARGIN_MINUTES` 时返回 InvalidMargin
    pub fn new(margin_minutes: i64) -> Result<Self, RuleError> {
        let margin = if (0..=MAX_IMPORT_MARGIN_MINUTES).contains(&margin_minutes) {
            TimeDelta::try_minutes(margin_minutes)
        } else {
            None
        };
        let margin = margin.ok_or(RuleError::InvalidMargin {
            minutes: margin_minutes,
        })?;
        Ok(Self {
            identities: IMPORT_IDENTITIES.iter().map(|s| s.to_string()).collect(),
            messages: RuleMatcher::new(IMPORT_MESSAGE_PATTERNS.clone())?,
            margin,
        })
    }

    pub fn margin(&self) -> TimeDelta {
        self.margin
    }

    fn is_import_identity(&self, email: &str) -> bool {
        let email = email.trim();
        self.identities.iter().any(|id| id.eq_ignore_ascii_case(email))
    }

    /// 评估某个 Commit 是否需要调整
    ///
    /// 只有 Committer 是批量导入身份且消息命中导入模式时才返回建议。
    pub fn evaluate(
        &self,
        committer_email: &str,
        message: &str,
        committed_at: DateTime<Utc>,
    ) -> Option<ImportAdjustment> {
        if !self.is_import_identity(committer_email) {
            return None;
        }
        let rule = self.messages.matching(message).into_iter().next()?;
        let adjusted = committed_at.checked_add_signed(self.margin)?;
        Some(ImportAdjustment {
            original: committed_at,
            adjusted,
            reason: rule.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn heuristic() -> ImportHeuristic {
        ImportHeuristic::new(DEFAULT_IMPORT_MARGIN_MINUTES).unwrap()
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2008, 10, 21, 17, 0, 0).unwrap()
    }

    #[test]
    fn test_import_commit_gets_five_minutes() {
        let adjustment = heuristic()
            .evaluate("initial-contribution@android.com", "Initial Contribution\n", at())
            .unwrap();
        assert_eq!(adjustment.original, at());
        assert_eq!(adjustment.adjusted, at() + TimeDelta::minutes(5));
        assert_eq!(adjustment.reason, "Initial contribution");
    }

    #[test]
    fn test_perforce_prefix() {
        let adjustment = heuristic().evaluate(
            "Initial-Contribution@android.com",
            "auto import from //branches/cupcake/...@137197",
            at(),
        );
        assert!(adjustment.is_some());
    }

    #[test]
    fn test_non_import_identity_never_adjusted() {
        assert!(heuristic()
            .evaluate("dev@android.com", "Initial Contribution", at())
            .is_none());
    }

    #[test]
    fn test_import_identity_with_ordinary_message() {
        assert!(heuristic()
            .evaluate("initial-contribution@android.com", "Fix build", at())
            .is_none());
    }

    #[test]
    fn test_custom_margin() {
        let heuristic = ImportHeuristic::new(10).unwrap();
        let adjustment = heuristic
            .evaluate("initial-contribution@android.com", "Code drop from //branches/donut", at())
            .unwrap();
        assert_eq!(adjustment.adjusted - adjustment.original, TimeDelta::minutes(10));
    }

    #[test]
    fn test_out_of_range_margin_is_rejected() {
        for minutes in [-1, MAX_IMPORT_MARGIN_MINUTES + 1, i64::MAX / 2, i64::MAX] {
            assert!(
                matches!(ImportHeuristic::new(minutes), Err(RuleError::InvalidMargin { .. })),
                "margin {} should be rejected",
                minutes
            );
        }
        assert!(ImportHeuristic::new(MAX_IMPORT_MARGIN_MINUTES).is_ok());
    }

    #[test]
    fn test_adjustment_past_max_time_is_dropped() {
        let heuristic = ImportHeuristic::new(MAX_IMPORT_MARGIN_MINUTES).unwrap();
        assert!(heuristic
            .evaluate("initial-contribution@android.com", "Initial Contribution", DateTime::<Utc>::MAX_UTC)
            .is_none());
    }
}
