//! 键值存储后端
//!
//! 参考点存储只依赖 get / set / delete 三个操作。
//! 键是显式的两级结构，不做字符串拼接。

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use super::error::StorageError;
use crate::models::{Field, Namespace};

/// 存储键
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// 旧版本不区分命名空间的键
    Legacy(Field),
    /// 按命名空间划分的键
    Scoped { namespace: Namespace, field: Field },
}

impl StorageKey {
    pub fn scoped(namespace: &Namespace, field: Field) -> Self {
        Self::Scoped {
            namespace: namespace.clone(),
            field,
        }
    }

    pub fn field(&self) -> Field {
        match self {
            Self::Legacy(field) | Self::Scoped { field, .. } => *field,
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy(field) => write!(f, "{}", field),
            Self::Scoped { namespace, field } => write!(f, "{}/{}", namespace, field),
        }
    }
}

/// 键值存储后端 trait
pub trait KeyValueBackend: Send {
    /// 读取值，不存在返回 None
    fn get(&self, key: &StorageKey) -> Result<Option<Value>, StorageError>;

    /// 写入值
    fn set(&mut self, key: &StorageKey, value: &Value) -> Result<(), StorageError>;

    /// 删除值，不存在时无操作
    fn delete(&mut self, key: &StorageKey) -> Result<(), StorageError>;
}

/// 内存存储 (用于测试和临时会话)
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    values: HashMap<StorageKey, Value>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前保存的键数量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueBackend for InMemoryBackend {
    fn get(&self, key: &StorageKey) -> Result<Option<Value>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &StorageKey, value: &Value) -> Result<(), StorageError> {
        self.values.insert(key.clone(), value.clone());
        Ok(())
    }

    fn delete(&mut self, key: &StorageKey) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_in_memory_roundtrip() {
        let mut backend = InMemoryBackend::new();
        let key = StorageKey::scoped(&Namespace::new("android"), Field::ReferenceTag);

        assert!(backend.get(&key).unwrap().is_none());
        backend.set(&key, &json!("android-4.0.3_r1")).unwrap();
        assert_eq!(backend.get(&key).unwrap(), Some(json!("android-4.0.3_r1")));

        backend.delete(&key).unwrap();
        assert!(backend.is_empty());
        // 重复删除无操作
        backend.delete(&key).unwrap();
    }

    #[test]
    fn test_legacy_and_scoped_keys_are_distinct() {
        let mut backend = InMemoryBackend::new();
        let legacy = StorageKey::Legacy(Field::ReferenceTime);
        let scoped = StorageKey::scoped(&Namespace::new("android"), Field::ReferenceTime);

        backend.set(&legacy, &json!(1)).unwrap();
        assert!(backend.get(&scoped).unwrap().is_none());
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_key_display() {
        let key = StorageKey::scoped(&Namespace::new("android"), Field::ReferenceTime);
        assert_eq!(key.to_string(), "android/referenceTime");
        assert_eq!(StorageKey::Legacy(Field::ReferenceTag).to_string(), "referenceTag");
    }
}
