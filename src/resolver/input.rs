//! 用户输入解析
//!
//! 日期时间文本、毫秒时间戳和 Commit SHA 的校验。

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use super::error::ResolveError;
use crate::models::{from_epoch_millis, parse_datetime};

static COMMIT_HASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-f]{40}$").expect("Invalid commit hash regex"));

/// 从日期时间文本解析参考时间
///
/// # Errors
/// 无法识别的文本返回 InvalidInput
pub fn resolve_from_datetime_string(text: &str) -> Result<DateTime<Utc>, ResolveError> {
    parse_datetime(text)
        .ok_or_else(|| ResolveError::InvalidInput(format!("无法解析的日期时间: {}", text.trim())))
}

/// 从毫秒时间戳文本解析参考时间
///
/// 只接受整数；空串、小数或超出可表示范围的值都返回 InvalidInput。
pub fn resolve_from_epoch_string(text: &str) -> Result<DateTime<Utc>, ResolveError> {
    let trimmed = text.trim();
    let millis: i64 = trimmed
        .parse()
        .map_err(|_| ResolveError::InvalidInput(format!("无效的时间戳: {}", trimmed)))?;
    from_epoch_millis(millis)
        .ok_or_else(|| ResolveError::InvalidInput(format!("时间戳超出范围: {}", millis)))
}

/// 校验 Commit SHA (去除首尾空白后必须为 40 位小写十六进制)
///
/// # Returns
/// 去除空白后的 SHA
pub fn validate_commit_hash(hash: &str) -> Result<&str, ResolveError> {
    let trimmed = hash.trim();
    if COMMIT_HASH.is_match(trimmed) {
        Ok(trimmed)
    } else {
        Err(ResolveError::InvalidHash(trimmed.to_string()))
    }
}
