//! 日志初始化和配置模块
//!
//! 这个模块提供了统一的日志初始化功能，使用 tracing 库。
//! 拦截器输出的查询日志以 `query_logger::query` 为 target、携带 `channel` 字段，
//! 可以通过 `EnvFilter` 单独控制，例如 `RUST_LOG=query_logger::query=debug`。

use std::io;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, time::SystemTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// 日志配置结构体
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 日志级别
    pub level: Level,
    /// 滚动日志文件目录，`None` 表示只输出到控制台
    pub log_dir: Option<PathBuf>,
}

impl LogConfig {
    /// 创建新的日志配置，使用默认级别
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置日志级别
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// 设置日志目录
    pub fn log_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.log_dir = Some(dir.into());
        self
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        // 查询日志以 debug 级别输出
        Self { level: Level::DEBUG, log_dir: None }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),
    #[error("日志配置错误: {0}")]
    Config(String),
}

/// 日志初始化结果
pub type LogResult<T> = Result<T, LogError>;

/// 初始化日志系统
///
/// - 始终输出到控制台
/// - 配置了 `log_dir` 时额外写入按天滚动的 `query.log` 文件
/// - `RUST_LOG` 优先于配置中的级别
///
/// 已经初始化过全局 subscriber 时直接返回 `Ok(())`。
///
/// # Examples
///
/// ```no_run
/// use query_logger::logging::{init_logging, LogConfig};
/// use tracing::Level;
///
/// let config = LogConfig::new().level(Level::DEBUG).log_dir("logs");
/// init_logging(config).unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> LogResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    let console_layer = fmt::layer()
        .with_timer(SystemTime)
        .with_target(true)
        .with_thread_ids(true)
        .with_ansi(true);

    let registry = Registry::default().with(env_filter).with(console_layer);

    let Some(dir) = config.log_dir else {
        let _ = registry.try_init();
        return Ok(());
    };

    if dir.as_os_str().is_empty() {
        return Err(LogError::Config("日志目录不能为空".to_string()));
    }
    std::fs::create_dir_all(&dir)?;

    let file_appender = tracing_appender::rolling::daily(&dir, "query.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_timer(SystemTime)
        .with_target(true)
        .with_thread_ids(true)
        .with_ansi(false);

    if registry.with(file_layer).try_init().is_ok() {
        // guard 被丢弃时后台写线程会退出，进程生命周期内保留
        std::mem::forget(guard);
        tracing::info!("日志系统初始化完成 - 输出到控制台和 {}", dir.display());
    }
    Ok(())
}

/// 使用默认配置初始化日志系统（debug 级别，仅控制台）
pub fn init_default_logging() -> LogResult<()> {
    init_logging(LogConfig::default())
}
