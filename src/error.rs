//! Unified application error types
//!
//! Provides a single error type for the command facade,
//! serialised as `{code, message}` for the presentation layer.

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::gitiles::GitilesError;
use crate::resolver::ResolveError;
use crate::rules::RuleError;
use crate::storage::StorageError;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Reference resolution error
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Settings storage error
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),

    /// Rule table error
    #[error("规则错误: {0}")]
    Rule(#[from] RuleError),

    /// Configuration error
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// Internal error
    #[error("内部错误: {0}")]
    Internal(String),
}

impl From<GitilesError> for AppError {
    fn from(err: GitilesError) -> Self {
        Self::Resolve(ResolveError::from(err))
    }
}

/// Serializable error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    /// Error code for client-side handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl AppError {
    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Resolve(ResolveError::InvalidInput(_)) => "INVALID_INPUT",
            Self::Resolve(ResolveError::InvalidHash(_)) => "INVALID_HASH",
            Self::Resolve(ResolveError::Network { .. }) => "NETWORK_ERROR",
            Self::Resolve(ResolveError::InvalidResponse(_)) => "INVALID_RESPONSE",
            Self::Resolve(ResolveError::Busy) => "BUSY",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Rule(_) => "RULE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        Self::from(&err)
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ErrorResponse::from(self).serialize(serializer)
    }
}
