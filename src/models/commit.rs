//! Commit 数据模型
//!
//! 从 Gitiles 页面或 JSON 接口提取的只读 Commit 记录。

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::time::{parse_datetime, to_iso_millis};

/// Commit 唯一标识 (通常是完整 SHA)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 前 12 位，用于日志
    pub fn short(&self) -> &str {
        let end = self.0.char_indices().nth(12).map(|(i, _)| i).unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommitId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CommitId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// 单条 Commit 记录
///
/// `committed_at` 为 None 表示时间文本无法解析，分类时直接排除。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Commit 标识
    pub id: CommitId,
    /// 作者邮箱
    pub author_email: String,
    /// Committer 时间
    pub committed_at: Option<DateTime<Utc>>,
    /// 完整 Commit 消息 (简略日志视图中不可用)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CommitRecord {
    pub fn new(
        id: impl Into<CommitId>,
        author_email: impl Into<String>,
        committed_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: id.into(),
            author_email: author_email.into(),
            committed_at,
            message: None,
        }
    }

    /// 从原始时间文本创建，解析失败时 `committed_at` 为 None
    pub fn from_raw(
        id: impl Into<CommitId>,
        author_email: impl Into<String>,
        raw_time: &str,
    ) -> Self {
        Self::new(id, author_email, parse_datetime(raw_time))
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// 人员信息 (作者或 Committer)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub email: String,
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// 远程 Commit 摘要，供用户确认参考点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitSummary {
    /// 消息首行
    pub subject: String,
    pub author: Person,
    pub committer: Person,
    pub committed_at: DateTime<Utc>,
}

impl CommitSummary {
    /// 截取消息首行
    pub fn subject_of(message: &str) -> String {
        message.lines().next().unwrap_or("").trim_end().to_string()
    }
}

impl fmt::Display for CommitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Message: {}", self.subject)?;
        writeln!(f)?;
        writeln!(f, "Authored by: {}", self.author)?;
        writeln!(f, "Committed by: {}", self.committer)?;
        writeln!(f)?;
        write!(f, "Commit date: {}", to_iso_millis(&self.committed_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_raw_invalid_time() {
        let record = CommitRecord::from_raw("abc", "a@google.com", "not a date");
        assert!(record.committed_at.is_none());
    }

    #[test]
    fn test_short_id() {
        let id = CommitId::new("0123456789abcdef0123456789abcdef01234567");
        assert_eq!(id.short(), "0123456789ab");
        assert_eq!(CommitId::new("abc").short(), "abc");
    }

    #[test]
    fn test_subject_of() {
        assert_eq!(CommitSummary::subject_of("Title\n\nBody text"), "Title");
        assert_eq!(CommitSummary::subject_of(""), "");
    }

    #[test]
    fn test_summary_display() {
        let summary = CommitSummary {
            subject: "Bump build ID".to_string(),
            author: Person {
                name: "Builder".to_string(),
                email: "builder@android.com".to_string(),
            },
            committer: Person {
                name: "Builder".to_string(),
                email: "builder@android.com".to_string(),
            },
            committed_at: Utc.with_ymd_and_hms(2011, 12, 6, 0, 0, 0).unwrap(),
        };
        let text = summary.to_string();
        assert!(text.starts_with("Message: Bump build ID"));
        assert!(text.contains("Authored by: Builder <builder@android.com>"));
        assert!(text.ends_with("Commit date: 2011-12-06T00:00:00.000Z"));
    }
}
