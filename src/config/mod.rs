//! Central configuration for the memory engine.
//!
//! Composed from domain submodules (injection, capture, metrics, decay,
//! logging, pruner), loaded from a JSON file at a platform-conventional
//! user-scoped path (spec §6), with missing fields taking defaults
//! (`serde(default)` throughout) and every numeric field clamped to its
//! declared range on load.

pub mod capture;
pub mod decay;
pub mod injection;
pub mod logging;
pub mod metrics;
pub mod pruner;

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use capture::CaptureConfig;
pub use decay::DecayConfig;
pub use injection::InjectionConfig;
pub use logging::{LogLevel, LoggingConfig};
pub use metrics::MetricsConfig;
pub use pruner::PrunerConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub injection: InjectionConfig,
    pub capture: CaptureConfig,
    pub metrics: MetricsConfig,
    pub decay: DecayConfig,
    pub logging: LoggingConfig,
    pub pruner: PrunerConfig,
}

impl Config {
    /// Clamp every field to its declared range, logging a warning and
    /// substituting a default for anything out of bounds. Never fails: a
    /// config this permissive always produces a usable value, handled
    /// inline at each submodule's `validate()` rather than through
    /// `EngineError` (spec §7's out-of-range policy: substitute default,
    /// log at warn).
    pub fn validate(&mut self) {
        self.injection.validate();
        self.metrics.validate();
        self.decay.validate();
        self.logging.validate();
        self.pruner.validate();
    }

    /// Load from the platform-conventional config path, falling back to
    /// defaults if the file is absent. A malformed file is a `ParseError`
    /// (logged at warn) that still yields a usable default config rather
    /// than aborting the process (spec §7).
    pub fn load() -> Self {
        match std::fs::read_to_string(default_config_path()) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(mut cfg) => {
                    cfg.validate();
                    cfg
                }
                Err(err) => {
                    tracing::warn!(error = %err, "failed to parse config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn from_json(contents: &str) -> Result<Self, EngineError> {
        serde_json::from_str(contents).map_err(EngineError::from)
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(mut cfg) => {
                    cfg.validate();
                    cfg
                }
                Err(_) => Self::default(),
            },
            Err(_) => Self::default(),
        }
    }
}

/// Hidden, user-scoped state directory holding the database, config, log
/// file, and `backups/` directory (spec §6 Persisted state layout).
pub fn state_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mira-memory")
}

pub fn default_config_path() -> PathBuf {
    state_dir().join("config.json")
}

pub fn default_db_path() -> PathBuf {
    if let Ok(path) = std::env::var("MIRA_MEMORY_DB_PATH") {
        return PathBuf::from(path);
    }
    state_dir().join("memory.db")
}

pub fn backups_dir() -> PathBuf {
    state_dir().join("backups")
}
