use serde::{Deserialize, Serialize};
use tracing::warn;

/// Settings for the optional remote neural-pruning collaborator.
///
/// The pruner itself is an external, best-effort HTTP service out of scope
/// for this core specification (spec §1, §4.8) — this struct exists only so
/// the documented config schema round-trips; nothing in this engine calls
/// out to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PrunerConfig {
    pub enabled: bool,
    pub url: String,
    pub threshold: f64,
    pub timeout: u32,
    pub adaptive_threshold: bool,
}

impl Default for PrunerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: String::new(),
            threshold: 0.5,
            timeout: 5000,
            adaptive_threshold: false,
        }
    }
}

impl PrunerConfig {
    pub fn validate(&mut self) {
        if !(0.0..=1.0).contains(&self.threshold) {
            warn!(value = self.threshold, "pruner.threshold out of range [0,1], using default");
            self.threshold = Self::default().threshold;
        }
        if !(1000..=30000).contains(&self.timeout) {
            warn!(value = self.timeout, "pruner.timeout out of range [1000,30000], using default");
            self.timeout = Self::default().timeout;
        }
    }
}
