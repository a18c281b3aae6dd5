//! Gitiles 模块
//!
//! 提供 Gitiles 路径约定、JSON 数据类型、HTTP 客户端以及页面数据提取。

pub mod client;
pub mod error;
pub mod extract;
pub mod paths;
pub mod types;

pub use client::{CommitSource, GitilesClient, DEFAULT_TIMEOUT_SECS};
pub use error::GitilesError;
pub use extract::{hash_from_permalink, records_from_entries, records_from_log_json, LogEntry};
pub use paths::{format_ref, path_to_ref, repo_home_path, RefKind, RefLink};
pub use types::{parse_gitiles_json, strip_xssi_prefix, GitilesCommit, GitilesLog, GitilesPerson, XSSI_PREFIX};
