//! 配置模块
//!
//! 管理 Gitiles 地址、build 仓库路径、请求超时等设置，支持从配置文件读取和保存。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::classifier::BoundaryPolicy;
use crate::gitiles::DEFAULT_TIMEOUT_SECS;
use crate::resolver::{
    DEFAULT_BUILD_REPO_PATH, DEFAULT_IMPORT_MARGIN_MINUTES, MAX_IMPORT_MARGIN_MINUTES,
};

/// 配置文件名
const CONFIG_FILENAME: &str = "settings.yaml";

/// 配置目录名
const CONFIG_DIRNAME: &str = "froyocomb";

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("配置文件读写失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置序列化失败: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("无效配置: {0}")]
    Invalid(String),
}

/// 助手配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelperConfig {
    /// Gitiles 站点地址，未设置时使用 `https://<host>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitiles_base_url: Option<String>,

    /// 存放 build ID 的仓库路径
    #[serde(default = "default_build_repo_path")]
    pub build_repo_path: String,

    /// 请求超时 (秒)
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// 批量导入安全余量 (分钟)
    #[serde(default = "default_import_margin_minutes")]
    pub import_margin_minutes: i64,

    /// 参考时间边界策略
    #[serde(default)]
    pub boundary: BoundaryPolicy,
}

fn default_build_repo_path() -> String {
    DEFAULT_BUILD_REPO_PATH.to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_import_margin_minutes() -> i64 {
    DEFAULT_IMPORT_MARGIN_MINUTES
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            gitiles_base_url: None,
            build_repo_path: default_build_repo_path(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            import_margin_minutes: default_import_margin_minutes(),
            boundary: BoundaryPolicy::default(),
        }
    }
}

impl HelperConfig {
    /// 默认配置目录 (`<config_dir>/froyocomb`)
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIRNAME))
    }

    /// 从配置目录加载配置
    ///
    /// # Arguments
    /// * `config_dir` - 配置目录路径
    ///
    /// # Returns
    /// 配置对象，文件不存在或无法解析时返回默认配置
    pub fn load(config_dir: &Path) -> Self {
        let config_path = Self::config_path(config_dir);

        if !config_path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&config_path) {
            Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %config_path.display(), error = %e, "malformed config, using defaults");
                Self::default()
            }),
            Err(e) => {
                warn!(path = %config_path.display(), error = %e, "unreadable config, using defaults");
                Self::default()
            }
        }
    }

    /// 保存配置到配置目录
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_yaml::to_string(self)?;
        fs::write(Self::config_path(config_dir), content)?;
        Ok(())
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::Invalid("fetch_timeout_secs 必须大于 0".to_string()));
        }
        if !self.build_repo_path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "build_repo_path 必须以 / 开头: {}",
                self.build_repo_path
            )));
        }
        if !(0..=MAX_IMPORT_MARGIN_MINUTES).contains(&self.import_margin_minutes) {
            return Err(ConfigError::Invalid(format!(
                "import_margin_minutes 必须在 0 到 {} 之间: {}",
                MAX_IMPORT_MARGIN_MINUTES, self.import_margin_minutes
            )));
        }
        Ok(())
    }

    /// 当前站点的 Gitiles 地址
    pub fn base_url_for(&self, host: &str) -> String {
        match &self.gitiles_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}", host.trim().trim_end_matches('/')),
        }
    }

    /// 配置文件的完整路径
    pub fn config_path(config_dir: &Path) -> PathBuf {
        config_dir.join(CONFIG_FILENAME)
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = HelperConfig::default();
        assert_eq!(config.build_repo_path, "/platform/build");
        assert_eq!(config.fetch_timeout_secs, 30);
        assert_eq!(config.import_margin_minutes, 5);
        assert_eq!(config.boundary, BoundaryPolicy::Inclusive);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_nonexistent_config() {
        let dir = tempdir().unwrap();
        assert_eq!(HelperConfig::load(dir.path()), HelperConfig::default());
    }

    #[test]
    fn test_load_malformed_config() {
        let dir = tempdir().unwrap();
        fs::write(HelperConfig::config_path(dir.path()), "fetch_timeout_secs: [oops").unwrap();
        assert_eq!(HelperConfig::load(dir.path()), HelperConfig::default());
    }

    #[test]
    fn test_load_partial_config() {
        let dir = tempdir().unwrap();
        fs::write(
            HelperConfig::config_path(dir.path()),
            "boundary: exclusive\nfetch_timeout_secs: 10\n",
        )
        .unwrap();

        let config = HelperConfig::load(dir.path());
        assert_eq!(config.boundary, BoundaryPolicy::Exclusive);
        assert_eq!(config.fetch_timeout_secs, 10);
        assert_eq!(config.build_repo_path, "/platform/build");
    }

    #[test]
    fn test_save_and_load_config() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");
        let config = HelperConfig {
            gitiles_base_url: Some("http://127.0.0.1:8080".to_string()),
            import_margin_minutes: 7,
            ..Default::default()
        };

        config.save(&nested).unwrap();

        assert_eq!(HelperConfig::load(&nested), config);
    }

    #[test]
    fn test_validate() {
        let zero_timeout = HelperConfig {
            fetch_timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(zero_timeout.validate(), Err(ConfigError::Invalid(_))));

        let relative_path = HelperConfig {
            build_repo_path: "platform/build".to_string(),
            ..Default::default()
        };
        assert!(relative_path.validate().is_err());
    }

    #[test]
    fn test_validate_import_margin_bounds() {
        for minutes in [-1, MAX_IMPORT_MARGIN_MINUTES + 1, i64::MAX / 2] {
            let config = HelperConfig {
                import_margin_minutes: minutes,
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "margin {} should be rejected",
                minutes
            );
        }

        let week = HelperConfig {
            import_margin_minutes: MAX_IMPORT_MARGIN_MINUTES,
            ..Default::default()
        };
        assert!(week.validate().is_ok());
    }

    #[test]
    fn test_load_huge_margin_fails_validation() {
        let dir = tempdir().unwrap();
        fs::write(
            HelperConfig::config_path(dir.path()),
            "import_margin_minutes: 4611686018427387903\n",
        )
        .unwrap();

        let config = HelperConfig::load(dir.path());
        assert_eq!(config.import_margin_minutes, i64::MAX / 2);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_url_for() {
        let config = HelperConfig::default();
        assert_eq!(
            config.base_url_for("android.googlesource.com"),
            "https://android.googlesource.com"
        );

        let overridden = HelperConfig {
            gitiles_base_url: Some("http://localhost:9000/".to_string()),
            ..Default::default()
        };
        assert_eq!(overridden.base_url_for("android.googlesource.com"), "http://localhost:9000");
    }
}
