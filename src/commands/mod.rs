//! 命令层
//!
//! 面向展示层的薄封装：参数整理、加锁、日志，然后调用各模块。

mod highlight;
mod reference;

pub use highlight::*;
pub use reference::*;

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::info;

use crate::classifier::BoundaryPolicy;
use crate::config::HelperConfig;
use crate::error::AppError;
use crate::gitiles::{CommitSource, GitilesClient};
use crate::models::Namespace;
use crate::resolver::{ImportHeuristic, RemoteResolver};
use crate::rules::{rules_for, RuleSet};
use crate::storage::{KeyValueBackend, ReferenceStore, StorageError};

/// 应用状态
///
/// 每个站点 (host) 一份：命名空间、编译后的规则、参考点存储和远程解析器。
pub struct AppState {
    pub namespace: Namespace,
    pub config: HelperConfig,
    pub rules: RuleSet,
    pub store: Mutex<ReferenceStore>,
    pub resolver: RemoteResolver,
}

impl AppState {
    /// 创建应用状态，使用 Gitiles HTTP 客户端
    ///
    /// # Arguments
    /// * `host` - 当前站点 host (如 `android.googlesource.com`)
    /// * `config` - 助手配置
    /// * `backend` - 设置存储后端
    pub fn new(
        host: &str,
        config: HelperConfig,
        backend: Box<dyn KeyValueBackend>,
    ) -> Result<Self, AppError> {
        config.validate()?;
        let client = GitilesClient::new(config.base_url_for(host), config.fetch_timeout_secs)
            .map_err(|e| AppError::internal(format!("无法创建 HTTP 客户端: {}", e)))?;
        Self::with_source(host, config, backend, Arc::new(client))
    }

    /// 使用自定义 Commit 来源创建
    ///
    /// 会执行旧版设置迁移并为未设置的字段写入默认值。
    pub fn with_source(
        host: &str,
        config: HelperConfig,
        backend: Box<dyn KeyValueBackend>,
        source: Arc<dyn CommitSource>,
    ) -> Result<Self, AppError> {
        config.validate()?;
        let namespace = Namespace::from_host(host);
        let rules = rules_for(&namespace)?;
        let heuristic = ImportHeuristic::new(config.import_margin_minutes)?;

        let mut store = ReferenceStore::new(backend);
        let report = store.migrate_legacy(&namespace)?;
        let seeded = store.seed_defaults(&namespace)?;

        info!(
            namespace = %namespace,
            rules = %rules.table,
            rules_version = rules.version,
            migrated = report.copied.len(),
            seeded = seeded.len(),
            "helper state initialised"
        );

        let resolver = RemoteResolver::new(source, config.build_repo_path.clone(), heuristic);

        Ok(Self {
            namespace,
            config,
            rules,
            store: Mutex::new(store),
            resolver,
        })
    }

    pub fn boundary(&self) -> BoundaryPolicy {
        self.config.boundary
    }

    pub(crate) fn lock_store(&self) -> Result<MutexGuard<'_, ReferenceStore>, AppError> {
        self.store
            .lock()
            .map_err(|_| AppError::from(StorageError::LockError))
    }
}
