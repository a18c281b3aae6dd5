//! 通过远程 Commit 解析参考时间
//!
//! 每个解析器只有一个请求槽位：`Idle -> InFlight -> Succeeded | Failed`。
//! 请求进行中再次调用直接返回 Busy，不会发起网络请求。

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::ResolveError;
use super::import_batch::{ImportAdjustment, ImportHeuristic};
use super::input::validate_commit_hash;
use crate::gitiles::{CommitSource, GitilesCommit};
use crate::models::{parse_datetime, CommitId, CommitSummary, Person};

/// 默认的 build 仓库路径
pub const DEFAULT_BUILD_REPO_PATH: &str = "/platform/build";

/// 解析结果，等待用户确认
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub commit: CommitId,
    pub committed_at: DateTime<Utc>,
    pub summary: CommitSummary,
    /// 批量导入时的调整建议
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<ImportAdjustment>,
}

impl Resolution {
    /// 用户确认后采用的参考时间
    pub fn accepted_time(&self, apply_adjustment: bool) -> DateTime<Utc> {
        match (&self.adjustment, apply_adjustment) {
            (Some(adjustment), true) => adjustment.adjusted,
            _ => self.committed_at,
        }
    }
}

/// 请求槽位状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum RequestState {
    Idle,
    InFlight { hash: String },
    Succeeded { hash: String },
    Failed { hash: String, message: String },
}

impl RequestState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight { .. })
    }
}

fn lock_state(state: &Mutex<RequestState>) -> MutexGuard<'_, RequestState> {
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// 占用请求槽位，未正常结束 (如被取消) 时恢复为 Idle
struct InFlightGuard {
    state: Arc<Mutex<RequestState>>,
    finished: bool,
}

impl InFlightGuard {
    fn acquire(state: &Arc<Mutex<RequestState>>, hash: &str) -> Result<Self, ResolveError> {
        let mut current = lock_state(state);
        if current.is_in_flight() {
            return Err(ResolveError::Busy);
        }
        *current = RequestState::InFlight {
            hash: hash.to_string(),
        };
        Ok(Self {
            state: Arc::clone(state),
            finished: false,
        })
    }

    fn finish(mut self, next: RequestState) {
        *lock_state(&self.state) = next;
        self.finished = true;
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if !self.finished {
            *lock_state(&self.state) = RequestState::Idle;
        }
    }
}

/// 远程 Commit 解析器
pub struct RemoteResolver {
    source: Arc<dyn CommitSource>,
    repo_path: String,
    heuristic: ImportHeuristic,
    state: Arc<Mutex<RequestState>>,
}

impl RemoteResolver {
    /// 创建解析器
    ///
    /// # Arguments
    /// * `source` - Commit 元数据来源
    /// * `repo_path` - 存放 build ID 的仓库路径
    /// * `heuristic` - 批量导入检测
    pub fn new(
        source: Arc<dyn CommitSource>,
        repo_path: impl Into<String>,
        heuristic: ImportHeuristic,
    ) -> Self {
        Self {
            source,
            repo_path: repo_path.into(),
            heuristic,
            state: Arc::new(Mutex::new(RequestState::Idle)),
        }
    }

    pub fn repo_path(&self) -> &str {
        &self.repo_path
    }

    /// 当前请求槽位状态
    pub fn state(&self) -> RequestState {
        lock_state(&self.state).clone()
    }

    /// 获取 Commit 元数据并生成待确认的解析结果
    ///
    /// 不会写入任何存储。
    ///
    /// # Errors
    /// - `InvalidHash`: SHA 格式错误 (不发起请求)
    /// - `Busy`: 已有请求进行中
    /// - `Network` / `InvalidResponse`: 请求失败或响应异常
    pub async fn resolve(&self, hash: &str) -> Result<Resolution, ResolveError> {
        let hash = validate_commit_hash(hash)?;
        let guard = InFlightGuard::acquire(&self.state, hash)?;

        info!(hash = %hash, repo = %self.repo_path, "resolving reference commit");
        let outcome = match self.source.fetch_commit(&self.repo_path, hash).await {
            Ok(commit) => self.build_resolution(hash, commit),
            Err(e) => Err(ResolveError::from(e)),
        };

        match &outcome {
            Ok(resolution) => {
                info!(
                    hash = %hash,
                    committed_at = %resolution.committed_at,
                    adjusted = resolution.adjustment.is_some(),
                    "reference commit resolved"
                );
                guard.finish(RequestState::Succeeded {
                    hash: hash.to_string(),
                });
            }
            Err(e) => {
                warn!(hash = %hash, error = %e, "reference commit resolution failed");
                guard.finish(RequestState::Failed {
                    hash: hash.to_string(),
                    message: e.to_string(),
                });
            }
        }

        outcome
    }

    fn build_resolution(&self, hash: &str, commit: GitilesCommit) -> Result<Resolution, ResolveError> {
        let committer = commit
            .committer
            .as_ref()
            .ok_or_else(|| ResolveError::InvalidResponse("缺少 committer 字段".to_string()))?;
        let raw_time = committer
            .time
            .as_deref()
            .ok_or_else(|| ResolveError::InvalidResponse("缺少 committer.time 字段".to_string()))?;
        let committed_at = parse_datetime(raw_time)
            .ok_or_else(|| ResolveError::InvalidResponse(format!("无法解析的提交时间: {}", raw_time)))?;

        let summary = CommitSummary {
            subject: CommitSummary::subject_of(&commit.message),
            author: Person::from(&commit.author),
            committer: Person::from(committer),
            committed_at,
        };
        let adjustment = self
            .heuristic
            .evaluate(&committer.email, &commit.message, committed_at);

        let id = if commit.commit.is_empty() {
            CommitId::new(hash)
        } else {
            CommitId::new(commit.commit)
        };

        Ok(Resolution {
            commit: id,
            committed_at,
            summary,
            adjustment,
        })
    }
}
