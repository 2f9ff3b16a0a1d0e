//! Logger setup for the short-lived binaries. Never writes to stdout — the
//! router's stdout is reserved for the single hook-response JSON line
//! (spec §4.7) — and a file appender keeps output off stderr too so host
//! processes never see stray log lines.

use crate::config::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;

/// Installs a global file-based subscriber. The returned guard must be held
/// for the lifetime of the process — dropping it flushes and stops the
/// background writer thread.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let dir = config.file.parent().unwrap_or_else(|| std::path::Path::new("."));
    if std::fs::create_dir_all(dir).is_err() {
        return None;
    }
    let file_name = config.file.file_name()?.to_str()?.to_string();

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let subscriber = tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::new(config.level.as_filter_str()))
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
    Some(guard)
}
