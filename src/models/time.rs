//! 时间文本解析
//!
//! Gitiles 页面、JSON 接口和用户输入使用的时间格式并不统一，
//! 这里集中处理所有可接受的格式，统一转换为 `DateTime<Utc>`。

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Git 默认日期格式 (`Tue Dec 06 00:00:00 2011 -0800`)
const GIT_DEFAULT_FORMAT: &str = "%a %b %d %H:%M:%S %Y %z";

/// 不带时区的日期时间格式，按 UTC 解释
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// 解析日期时间文本
///
/// 依次尝试 RFC 3339、RFC 2822、Git 默认格式、无时区格式 (UTC)
/// 以及纯日期格式 (UTC 零点)。无法识别时返回 None。
///
/// # Examples
/// ```
/// use froyocomb_lib::models::parse_datetime;
///
/// let a = parse_datetime("2011-12-06T00:00:00Z").unwrap();
/// let b = parse_datetime("Tue Dec 06 00:00:00 2011 +0000").unwrap();
/// assert_eq!(a, b);
/// assert!(parse_datetime("banana").is_none());
/// ```
pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }

    // Gitiles 会用空格补齐日期 ("Dec  6")，先压缩空白
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if let Ok(dt) = DateTime::parse_from_str(&collapsed, GIT_DEFAULT_FORMAT) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// 毫秒时间戳转换为 UTC 时间，超出范围返回 None
pub fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

/// 以毫秒精度输出 ISO 8601 (`2011-12-06T00:00:00.000Z`)
pub fn to_iso_millis(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}
