//! 规则错误类型定义

use thiserror::Error;

/// 规则编译错误
#[derive(Debug, Error)]
pub enum RuleError {
    /// 无效的正则表达式模式
    #[error("Invalid regex pattern in rule '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// 安全余量超出可表示范围
    #[error("Import margin out of range: {minutes} minutes")]
    InvalidMargin { minutes: i64 },
}
