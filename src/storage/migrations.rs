//! Settings migrations
//!
//! 旧版本把参考点保存在不区分站点的键上 (`referenceTime`)，
//! 启动时将其迁移到当前站点的命名空间下 (`android` / `referenceTime`)。

use serde::Serialize;
use tracing::info;

use super::backend::StorageKey;
use super::error::StorageError;
use super::reference_store::ReferenceStore;
use crate::models::{Field, Namespace};

/// 迁移结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// 复制到命名空间下的字段
    pub copied: Vec<Field>,
    /// 已删除的旧键
    pub removed: Vec<Field>,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        self.copied.is_empty() && self.removed.is_empty()
    }
}

impl ReferenceStore {
    /// 一次性迁移旧版不区分命名空间的设置
    ///
    /// 对每个字段：旧值存在且命名空间下没有值时复制过去，然后删除旧值。
    /// 旧键不存在时无操作，可重复执行。
    pub fn migrate_legacy(&mut self, namespace: &Namespace) -> Result<MigrationReport, StorageError> {
        let mut report = MigrationReport::default();

        for field in Field::ALL {
            let legacy_key = StorageKey::Legacy(field);
            let scoped_key = StorageKey::scoped(namespace, field);

            if !self.has_raw(&legacy_key)? {
                continue;
            }

            // 类型不符的旧值 read 返回 None，只删除不复制
            if let Some(value) = self.read(&legacy_key)? {
                if self.read(&scoped_key)?.is_none() {
                    self.write(&scoped_key, &value)?;
                    report.copied.push(field);
                }
            }

            self.remove(&legacy_key)?;
            report.removed.push(field);
        }

        if !report.is_noop() {
            info!(
                namespace = %namespace,
                copied = ?report.copied,
                removed = ?report.removed,
                "migrated legacy settings"
            );
        }

        Ok(report)
    }
}
