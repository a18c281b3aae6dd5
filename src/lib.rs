// Froyocomb Helper Library
// Highlights Gitiles log commits made at or before a reference point

pub mod classifier;
pub mod commands;
pub mod config;
pub mod error;
pub mod gitiles;
pub mod logging;
pub mod models;
pub mod resolver;
pub mod rules;
pub mod storage;

use std::path::Path;

use tracing::info;

use commands::AppState;
use config::HelperConfig;
use error::AppError;
use storage::Database;

/// Database file name
const DATABASE_FILENAME: &str = "froyocomb.db";

/// 打开某个站点的助手状态
///
/// 从 `config_dir` 读取配置并打开其中的 SQLite 设置库。
/// 不会安装全局日志 subscriber，需要日志输出时由调用方先调用 [`logging::init_logging`]。
///
/// # Arguments
/// * `host` - 当前站点 host
/// * `config_dir` - 配置目录，None 时使用系统配置目录
pub fn open(host: &str, config_dir: Option<&Path>) -> Result<AppState, AppError> {
    let config_dir = match config_dir {
        Some(dir) => dir.to_path_buf(),
        None => HelperConfig::default_dir()
            .ok_or_else(|| AppError::internal("无法确定配置目录"))?,
    };
    std::fs::create_dir_all(&config_dir)
        .map_err(|e| AppError::internal(format!("无法创建配置目录: {}", e)))?;

    let config = HelperConfig::load(&config_dir);
    let db_path = config_dir.join(DATABASE_FILENAME);
    let database = Database::new(&db_path)?;
    info!(path = %db_path.display(), "settings database opened");

    AppState::new(host, config, Box::new(database))
}
