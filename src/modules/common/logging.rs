use std::path::PathBuf;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const APP_DIR: &str = "twincat-sweeper";
const LOG_FILE: &str = "twincat-sweeper.log";

/// `RUST_LOG` 优先，否则按 verbose 选择级别
fn build_filter(verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { "info" };

    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "twincat_sweeper={level},twincat_sweeper_lib={level},info"
        ))
    })
}

/// 日志同时写入按天滚动的文件和 stderr，进程内只初始化一次
pub fn init_logging(verbose: bool) {
    let log_dir = get_log_dir();
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("无法创建日志目录 {}: {}", log_dir.display(), e);
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // 写线程需存活到进程退出
    std::mem::forget(guard);

    let result = tracing_subscriber::registry()
        .with(build_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(non_blocking),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();

    if result.is_ok() {
        tracing::debug!("日志目录: {}", log_dir.display());
    }
}

pub fn get_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("logs")
}
