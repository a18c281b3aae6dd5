//! 参考点解析模块
//!
//! 参考时间可以来自日期时间文本、毫秒时间戳，或远程 Commit 的提交时间。

mod error;
mod import_batch;
mod input;
mod remote;

pub use error::ResolveError;
pub use import_batch::{
    ImportAdjustment, ImportHeuristic, DEFAULT_IMPORT_MARGIN_MINUTES, IMPORT_IDENTITIES,
    IMPORT_MESSAGE_PATTERNS, MAX_IMPORT_MARGIN_MINUTES,
};
pub use input::{resolve_from_datetime_string, resolve_from_epoch_string, validate_commit_hash};
pub use remote::{RemoteResolver, RequestState, Resolution, DEFAULT_BUILD_REPO_PATH};
