//! 参考点存储
//!
//! 唯一的设置写入方。读取永不失败：未设置、读取出错或类型不符时返回命名空间默认值。

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use super::backend::{KeyValueBackend, StorageKey};
use super::error::StorageError;
use crate::models::{Field, FieldValue, Namespace, ReferencePoint};

/// 参考点存储
pub struct ReferenceStore {
    backend: Box<dyn KeyValueBackend>,
}

impl ReferenceStore {
    pub fn new(backend: Box<dyn KeyValueBackend>) -> Self {
        Self { backend }
    }

    /// 读取已持久化的值 (不填充默认值)
    ///
    /// 类型不符合字段要求的值视为未设置。
    pub(super) fn read(&self, key: &StorageKey) -> Result<Option<FieldValue>, StorageError> {
        let Some(raw) = self.backend.get(key)? else {
            return Ok(None);
        };

        match serde_json::from_value::<FieldValue>(raw) {
            Ok(value) if key.field().accepts(&value) => Ok(Some(value)),
            Ok(_) | Err(_) => {
                warn!(key = %key, "ignoring stored value with unexpected type");
                Ok(None)
            }
        }
    }

    /// 原始键是否存在 (不校验类型)
    pub(super) fn has_raw(&self, key: &StorageKey) -> Result<bool, StorageError> {
        Ok(self.backend.get(key)?.is_some())
    }

    pub(super) fn write(&mut self, key: &StorageKey, value: &FieldValue) -> Result<(), StorageError> {
        let raw: Value = serde_json::to_value(value)?;
        self.backend.set(key, &raw)
    }

    pub(super) fn remove(&mut self, key: &StorageKey) -> Result<(), StorageError> {
        self.backend.delete(key)
    }

    /// 读取字段值，未设置时返回命名空间默认值
    pub fn get(&self, namespace: &Namespace, field: Field) -> FieldValue {
        let key = StorageKey::scoped(namespace, field);
        match self.read(&key) {
            Ok(Some(value)) => value,
            Ok(None) => field.default_for(namespace),
            Err(e) => {
                warn!(key = %key, error = %e, "failed to read setting, using default");
                field.default_for(namespace)
            }
        }
    }

    /// 写入字段值
    ///
    /// # Errors
    /// 值类型与字段不符时返回 TypeMismatch；底层存储错误原样返回
    pub fn set(
        &mut self,
        namespace: &Namespace,
        field: Field,
        value: FieldValue,
    ) -> Result<(), StorageError> {
        if !field.accepts(&value) {
            return Err(StorageError::TypeMismatch { field });
        }
        let key = StorageKey::scoped(namespace, field);
        debug!(key = %key, value = ?value, "writing setting");
        self.write(&key, &value)
    }

    /// 为未设置的字段写入默认值
    ///
    /// # Returns
    /// 本次写入的字段
    pub fn seed_defaults(&mut self, namespace: &Namespace) -> Result<Vec<Field>, StorageError> {
        let mut seeded = Vec::new();
        for field in Field::ALL {
            let key = StorageKey::scoped(namespace, field);
            if self.read(&key)?.is_none() {
                self.write(&key, &field.default_for(namespace))?;
                seeded.push(field);
            }
        }
        if !seeded.is_empty() {
            debug!(namespace = %namespace, fields = ?seeded, "seeded default settings");
        }
        Ok(seeded)
    }

    /// 读取完整参考点
    pub fn reference_point(&self, namespace: &Namespace) -> ReferencePoint {
        let defaults = ReferencePoint::defaults_for(namespace);
        let text = |field: Field, fallback: String| {
            self.get(namespace, field)
                .as_text()
                .map(str::to_string)
                .unwrap_or(fallback)
        };

        ReferencePoint {
            tag: text(Field::ReferenceTag, defaults.tag.clone()),
            branch: text(Field::ReferenceBranch, defaults.branch.clone()),
            timestamp: self
                .get(namespace, Field::ReferenceTime)
                .as_millis()
                .unwrap_or(defaults.timestamp),
        }
    }

    pub fn set_reference_tag(&mut self, namespace: &Namespace, tag: &str) -> Result<(), StorageError> {
        self.set(namespace, Field::ReferenceTag, FieldValue::text(tag))
    }

    pub fn set_reference_branch(
        &mut self,
        namespace: &Namespace,
        branch: &str,
    ) -> Result<(), StorageError> {
        self.set(namespace, Field::ReferenceBranch, FieldValue::text(branch))
    }

    pub fn set_reference_time(
        &mut self,
        namespace: &Namespace,
        time: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        self.set(
            namespace,
            Field::ReferenceTime,
            FieldValue::Millis(time.timestamp_millis()),
        )
    }
}
