// 日志工具模块
//
// 封装 flexi_logger 的初始化和关闭，编译器内部统一通过 log 宏输出

use crate::config::{Config, LogConfig};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use std::sync::Mutex;

/// 全局日志句柄，关闭时 flush
static LOGGER_HANDLE: Mutex<Option<LoggerHandle>> = Mutex::new(None);

/// 按配置初始化文件日志
///
/// 重复初始化会返回错误，已有的句柄保持不变
///
/// # Examples
/// ```no_run
/// use graphplan::config::Config;
/// use graphplan::utils::logging;
///
/// let config = Config::default();
/// logging::init(&config).expect("日志初始化失败");
/// logging::shutdown();
/// ```
pub fn init(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    init_with(&config.log)
}

pub fn init_with(log_config: &LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut guard = LOGGER_HANDLE
        .lock()
        .map_err(|_| "日志句柄锁已中毒".to_string())?;
    if guard.is_some() {
        return Err("日志系统已经初始化".into());
    }

    let handle = Logger::try_with_str(&log_config.level)?
        .log_to_file(
            FileSpec::default()
                .basename(&log_config.file)
                .directory(&log_config.dir),
        )
        .rotate(
            Criterion::Size(log_config.max_file_size),
            Naming::Numbers,
            Cleanup::KeepLogFiles(log_config.max_files),
        )
        .write_mode(WriteMode::Async)
        .append()
        .start()?;
    *guard = Some(handle);

    log::info!(
        "日志系统初始化完成: {}/{} ({})",
        log_config.dir,
        log_config.file,
        log_config.level
    );
    Ok(())
}

/// 刷新并关闭日志系统
pub fn shutdown() {
    if let Ok(mut guard) = LOGGER_HANDLE.lock() {
        if let Some(handle) = guard.take() {
            handle.flush();
            handle.shutdown();
        }
    }
}

pub fn is_initialized() -> bool {
    LOGGER_HANDLE
        .lock()
        .map(|guard| guard.is_some())
        .unwrap_or(false)
}
