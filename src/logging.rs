//! 日志初始化

use tracing_subscriber::EnvFilter;

/// 日志过滤环境变量
pub const LOG_ENV: &str = "FROYOCOMB_LOG";

/// 安装全局 fmt subscriber
///
/// 过滤规则读取 `FROYOCOMB_LOG`，未设置时为 `info`。重复调用不会报错。
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
