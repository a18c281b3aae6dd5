//! 参考点数据模型
//!
//! 每个站点命名空间保存一组参考点设置 (tag / branch / 时间)。

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::time::from_epoch_millis;

/// Android 命名空间的默认参考 tag
pub const ANDROID_DEFAULT_TAG: &str = "android-4.0.1_r1";
/// Android 命名空间的默认参考分支
pub const ANDROID_DEFAULT_BRANCH: &str = "ics-mr0-release";
/// 其他命名空间的默认 tag
pub const GENERIC_DEFAULT_TAG: &str = "TAG";
/// 其他命名空间的默认分支
pub const GENERIC_DEFAULT_BRANCH: &str = "main";

/// 站点命名空间
///
/// 由当前主机名的第一段派生 (`android.googlesource.com` → `android`)。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    pub const ANDROID: &'static str = "android";
    pub const CHROMIUM: &'static str = "chromium";
    const FALLBACK: &'static str = "default";

    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into().trim().to_ascii_lowercase();
        if name.is_empty() {
            Self(Self::FALLBACK.to_string())
        } else {
            Self(name)
        }
    }

    /// 从主机名派生命名空间，忽略端口
    pub fn from_host(host: &str) -> Self {
        let host = host.trim();
        let host = host.split(':').next().unwrap_or("");
        Self::new(host.split('.').next().unwrap_or(""))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_android(&self) -> bool {
        self.0 == Self::ANDROID
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 参考点字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "referenceTag")]
    ReferenceTag,
    #[serde(rename = "referenceBranch")]
    ReferenceBranch,
    #[serde(rename = "referenceTime")]
    ReferenceTime,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::ReferenceTag, Field::ReferenceBranch, Field::ReferenceTime];

    /// 持久化使用的字段名
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReferenceTag => "referenceTag",
            Self::ReferenceBranch => "referenceBranch",
            Self::ReferenceTime => "referenceTime",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }

    /// 字段在指定命名空间下的默认值
    pub fn default_for(&self, namespace: &Namespace) -> FieldValue {
        match self {
            Self::ReferenceTag if namespace.is_android() => FieldValue::text(ANDROID_DEFAULT_TAG),
            Self::ReferenceTag => FieldValue::text(GENERIC_DEFAULT_TAG),
            Self::ReferenceBranch if namespace.is_android() => {
                FieldValue::text(ANDROID_DEFAULT_BRANCH)
            }
            Self::ReferenceBranch => FieldValue::text(GENERIC_DEFAULT_BRANCH),
            Self::ReferenceTime => FieldValue::Millis(0),
        }
    }

    /// 值的类型是否适用于该字段
    pub fn accepts(&self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (Self::ReferenceTag | Self::ReferenceBranch, FieldValue::Text(_))
                | (Self::ReferenceTime, FieldValue::Millis(_))
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 字段值
///
/// 序列化为裸 JSON 字符串或数字，与浏览器端存储保持一致。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Millis(i64),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Millis(_) => None,
        }
    }

    pub fn as_millis(&self) -> Option<i64> {
        match self {
            Self::Millis(ms) => Some(*ms),
            Self::Text(_) => None,
        }
    }
}

/// 某个命名空间的完整参考点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub tag: String,
    pub branch: String,
    /// 毫秒时间戳
    pub timestamp: i64,
}

impl ReferencePoint {
    /// 命名空间默认值
    pub fn defaults_for(namespace: &Namespace) -> Self {
        let text = |field: Field| {
            field
                .default_for(namespace)
                .as_text()
                .unwrap_or_default()
                .to_string()
        };
        Self {
            tag: text(Field::ReferenceTag),
            branch: text(Field::ReferenceBranch),
            timestamp: 0,
        }
    }

    /// 参考时间，超出范围时回退到 epoch
    pub fn time(&self) -> DateTime<Utc> {
        from_epoch_millis(self.timestamp).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}
