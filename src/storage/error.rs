//! Storage module error types
//!
//! Provides error types for settings persistence.

use thiserror::Error;

use crate::models::Field;

/// Storage operation error type
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database connection or query error
    #[error("数据库错误: {0}")]
    Database(#[from] rusqlite::Error),

    /// Data serialization error
    #[error("数据序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Value type does not fit the field
    #[error("字段 {field} 的值类型不匹配")]
    TypeMismatch {
        /// Target field
        field: Field,
    },

    /// Lock error when accessing the store
    #[error("存储锁错误")]
    LockError,
}
