use std::fs;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::http_cache::app_cache_dir;

const LOG_FILE_PREFIX: &str = "mlb_streak_terminal.log";

/// Installs a file subscriber; the terminal UI owns stdout and stderr.
///
/// Returns the appender guard (which must outlive the app) and the log directory,
/// or `None` when no writable directory exists.
pub fn init_logging() -> Option<(WorkerGuard, PathBuf)> {
    let log_dir = std::env::var("LOG_DIR")
        .ok()
        .filter(|dir| !dir.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| app_cache_dir().map(|dir| dir.join("logs")))?;

    // rolling::daily panics when it cannot create its first file.
    fs::create_dir_all(&log_dir).ok()?;
    let write_test = log_dir.join(".write_test");
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&write_test)
        .ok()?;
    let _ = fs::remove_file(&write_test);

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .ok()?;

    Some((guard, log_dir))
}
