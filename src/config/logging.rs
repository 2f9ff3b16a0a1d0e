use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Settings for the engine's own logging (ambient stack, SPEC_FULL §2).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: default_log_path(),
        }
    }
}

fn default_log_path() -> PathBuf {
    crate::config::state_dir().join("engine.log")
}

impl LoggingConfig {
    /// Nothing to clamp numerically; malformed level strings are caught by
    /// serde itself and surface as a `ParseError` at load time, not here.
    pub fn validate(&mut self) {
        if self.file.as_os_str().is_empty() {
            warn!("logging.file was empty, using default");
            self.file = Self::default().file;
        }
    }
}
