//! 页面数据提取
//!
//! 把日志页面条目或日志 JSON 转为 `CommitRecord`，与分类逻辑隔离。

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::GitilesError;
use super::types::{parse_gitiles_json, GitilesLog};
use crate::models::CommitRecord;

/// 永久链接中的 Commit SHA (`/+/<40 hex>`)
static PERMALINK_HASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\+/([0-9a-f]{40})(?:[/?#]|$)").expect("Invalid permalink regex"));

/// 日志页面中的单个条目
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// 条目永久链接 href
    pub permalink: String,
    /// 作者元素的 title (邮箱)
    pub author_title: String,
    /// 时间元素的 title (完整时间文本)
    pub time_title: String,
    /// 完整消息，简略视图中没有
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// 从永久链接中提取 Commit SHA
pub fn hash_from_permalink(permalink: &str) -> Option<&str> {
    PERMALINK_HASH
        .captures(permalink)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

impl LogEntry {
    /// 转为 Commit 记录，无法识别 SHA 时返回 None
    pub fn to_record(&self) -> Option<CommitRecord> {
        let hash = hash_from_permalink(&self.permalink)?;
        let record = CommitRecord::from_raw(hash, self.author_title.trim(), &self.time_title);
        Some(match &self.message {
            Some(message) => record.with_message(message.as_str()),
            None => record,
        })
    }
}

/// 批量转换页面条目
///
/// 无法识别 SHA 的条目会被跳过并记录警告。
pub fn records_from_entries(entries: &[LogEntry]) -> Vec<CommitRecord> {
    entries
        .iter()
        .filter_map(|entry| {
            let record = entry.to_record();
            if record.is_none() {
                warn!(permalink = %entry.permalink, "skipping log entry without commit hash");
            }
            record
        })
        .collect()
}

/// 从日志 JSON 响应体提取记录
///
/// # Errors
/// 响应体无法解析时返回 Decode 错误
pub fn records_from_log_json(body: &str) -> Result<Vec<CommitRecord>, GitilesError> {
    let log: GitilesLog = parse_gitiles_json(body)?;
    Ok(log
        .log
        .iter()
        .filter_map(|commit| {
            let record = commit.to_record();
            if record.is_none() {
                warn!("skipping log JSON entry without commit hash");
            }
            record
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "5e1b3f9e2a8c4d7f6b0a1c2d3e4f5a6b7c8d9e0f";

    fn entry(permalink: &str) -> LogEntry {
        LogEntry {
            permalink: permalink.to_string(),
            author_title: "dev@android.com".to_string(),
            time_title: "Tue Dec 06 00:00:00 2011 +0000".to_string(),
            message: None,
        }
    }

    #[test]
    fn test_hash_from_permalink() {
        assert_eq!(
            hash_from_permalink(&format!("/platform/build/+/{}", HASH)),
            Some(HASH)
        );
        assert_eq!(
            hash_from_permalink(&format!("/platform/build/+/{}/core/Makefile", HASH)),
            Some(HASH)
        );
        assert_eq!(hash_from_permalink("/platform/build/+/refs/heads/master"), None);
        assert_eq!(hash_from_permalink(&format!("/platform/build/+/{}0", HASH)), None);
    }

    #[test]
    fn test_entry_to_record() {
        let mut e = entry(&format!("/platform/build/+/{}", HASH));
        e.author_title = "  dev@android.com ".to_string();
        e.message = Some("Initial Contribution".to_string());

        let record = e.to_record().unwrap();
        assert_eq!(record.id.as_str(), HASH);
        assert_eq!(record.author_email, "dev@android.com");
        assert!(record.committed_at.is_some());
        assert_eq!(record.message.as_deref(), Some("Initial Contribution"));
    }

    #[test]
    fn test_unparsable_time_keeps_record() {
        let mut e = entry(&format!("/platform/build/+/{}", HASH));
        e.time_title = "3 weeks ago".to_string();
        let record = e.to_record().unwrap();
        assert!(record.committed_at.is_none());
    }

    #[test]
    fn test_records_from_entries_skips_unrecognised() {
        let entries = vec![
            entry("/platform/build/+/refs/tags/android-4.0.1_r1"),
            entry(&format!("/platform/build/+/{}", HASH)),
        ];
        let records = records_from_entries(&entries);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_str(), HASH);
    }

    #[test]
    fn test_records_from_log_json() {
        let body = format!(
            ")]}}'\n{{\"log\": [{{\"commit\": \"{}\", \"author\": {{\"name\": \"A\", \"email\": \"a@google.com\", \"time\": \"Tue Dec 06 00:00:00 2011 +0000\"}}, \"committer\": {{\"name\": \"A\", \"email\": \"a@google.com\", \"time\": \"Tue Dec 06 00:00:00 2011 +0000\"}}, \"message\": \"m\"}}, {{\"message\": \"no hash\"}}]}}",
            HASH
        );
        let records = records_from_log_json(&body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].author_email, "a@google.com");
    }

    #[test]
    fn test_records_from_log_json_invalid() {
        assert!(records_from_log_json("<html>").is_err());
    }
}
