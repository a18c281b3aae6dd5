//! Gitiles JSON 数据类型
//!
//! Gitiles 的 `?format=JSON` 响应以 `)]}'` 开头一行防 JSON 劫持，解析前需去除。

use serde::{Deserialize, Serialize};

use super::error::GitilesError;
use crate::models::{parse_datetime, CommitRecord, Person};

/// 防 JSON 劫持前缀
pub const XSSI_PREFIX: &str = ")]}'";

/// 去除防劫持前缀行
pub fn strip_xssi_prefix(body: &str) -> &str {
    match body.strip_prefix(XSSI_PREFIX) {
        Some(rest) => rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')).unwrap_or(rest),
        None => body,
    }
}

/// 解析 Gitiles JSON 响应体
pub fn parse_gitiles_json<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, GitilesError> {
    serde_json::from_str(strip_xssi_prefix(body)).map_err(GitilesError::from)
}

/// 作者或 Committer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitilesPerson {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Git 默认格式的时间文本 (`Tue Dec 06 00:00:00 2011 +0000`)
    #[serde(default)]
    pub time: Option<String>,
}

impl From<&GitilesPerson> for Person {
    fn from(person: &GitilesPerson) -> Self {
        Person {
            name: person.name.clone(),
            email: person.email.clone(),
        }
    }
}

/// 单个 Commit 的元数据
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitilesCommit {
    /// 完整 SHA
    #[serde(default)]
    pub commit: String,
    #[serde(default)]
    pub tree: Option<String>,
    #[serde(default)]
    pub parents: Vec<String>,
    #[serde(default)]
    pub author: GitilesPerson,
    /// 缺少 committer 时为 None
    #[serde(default)]
    pub committer: Option<GitilesPerson>,
    #[serde(default)]
    pub message: String,
}

impl GitilesCommit {
    /// 转为分类器使用的记录
    ///
    /// `commit` 为空时返回 None。
    pub fn to_record(&self) -> Option<CommitRecord> {
        if self.commit.is_empty() {
            return None;
        }
        let committed_at = self
            .committer
            .as_ref()
            .and_then(|c| c.time.as_deref())
            .and_then(parse_datetime);
        Some(
            CommitRecord::new(self.commit.as_str(), self.author.email.as_str(), committed_at)
                .with_message(self.message.as_str()),
        )
    }
}

/// 日志视图 (`+log?format=JSON`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitilesLog {
    #[serde(default)]
    pub log: Vec<GitilesCommit>,
    /// 下一页起点
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// 上一页起点
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
}
