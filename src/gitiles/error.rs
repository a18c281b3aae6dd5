//! Gitiles 模块错误类型

use thiserror::Error;

/// Gitiles 请求错误
#[derive(Debug, Error)]
pub enum GitilesError {
    /// 非 2xx 响应，附带响应体
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// 请求超时
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// 连接或传输错误
    #[error("Network error: {0}")]
    Transport(String),

    /// 响应体不是有效的 Gitiles JSON
    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = GitilesError::Status {
            status: 404,
            body: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
    }
}
