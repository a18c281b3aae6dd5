//! 参考点解析错误类型

use thiserror::Error;

use crate::gitiles::GitilesError;

/// 参考点解析错误
#[derive(Debug, Error)]
pub enum ResolveError {
    /// 日期时间或时间戳文本无法解析
    #[error("无效输入: {0}")]
    InvalidInput(String),

    /// 不是 40 位小写十六进制 SHA
    #[error("无效的 Commit SHA: {0}")]
    InvalidHash(String),

    /// 网络错误 (非 2xx 响应、超时或连接失败)
    #[error("网络错误: {message}")]
    Network {
        /// HTTP 状态码，传输层失败时为 None
        status: Option<u16>,
        message: String,
    },

    /// 响应内容不符合预期
    #[error("无效响应: {0}")]
    InvalidResponse(String),

    /// 已有请求正在进行
    #[error("已有解析请求正在进行")]
    Busy,
}

impl From<GitilesError> for ResolveError {
    fn from(err: GitilesError) -> Self {
        match err {
            GitilesError::Status { status, body } => ResolveError::Network {
                status: Some(status),
                message: if body.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    format!("HTTP {}: {}", status, body)
                },
            },
            GitilesError::Timeout(_) | GitilesError::Transport(_) => ResolveError::Network {
                status: None,
                message: err.to_string(),
            },
            GitilesError::Decode(e) => ResolveError::InvalidResponse(e.to_string()),
        }
    }
}
