//! Gitiles HTTP 客户端
//!
//! 通过 `<repo>/+/<ref>?format=JSON` 获取单个 Commit 的元数据。

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::error::GitilesError;
use super::paths::{format_ref, path_to_ref, RefKind};
use super::types::{parse_gitiles_json, GitilesCommit};

/// 默认请求超时 (秒)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Commit 元数据来源
#[async_trait]
pub trait CommitSource: Send + Sync {
    /// 获取指定仓库中某个 Commit 的元数据
    ///
    /// # Arguments
    /// * `repo_path` - 仓库路径 (如 `/platform/build`)
    /// * `commit` - 完整 SHA
    async fn fetch_commit(&self, repo_path: &str, commit: &str) -> Result<GitilesCommit, GitilesError>;
}

/// Gitiles 客户端
pub struct GitilesClient {
    http_client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl GitilesClient {
    /// 创建新的客户端
    ///
    /// # Arguments
    /// * `base_url` - 站点地址 (如 `https://android.googlesource.com`)
    /// * `timeout_secs` - 请求超时
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, GitilesError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GitilesError::Transport(e.to_string()))?;
        Ok(Self::with_client(base_url, http_client, timeout_secs))
    }

    /// 使用自定义 HTTP 客户端创建
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client, timeout_secs: u64) -> Self {
        Self {
            http_client: client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_secs,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Commit JSON 地址 (不含查询参数)
    pub fn commit_url(&self, repo_path: &str, commit: &str) -> String {
        let path = path_to_ref(repo_path, &format_ref(RefKind::Commit, commit), "");
        format!("{}{}", self.base_url, path)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> GitilesError {
        if err.is_timeout() {
            GitilesError::Timeout(self.timeout_secs)
        } else {
            GitilesError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl CommitSource for GitilesClient {
    async fn fetch_commit(&self, repo_path: &str, commit: &str) -> Result<GitilesCommit, GitilesError> {
        let url = self.commit_url(repo_path, commit);
        debug!(url = %url, "fetching commit metadata");

        let response = self
            .http_client
            .get(&url)
            .query(&[("format", "JSON")])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "commit metadata request failed");
            return Err(GitilesError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        parse_gitiles_json(&body)
    }
}
