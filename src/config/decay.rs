use serde::{Deserialize, Serialize};
use tracing::warn;

/// Settings for the relevance lifecycle (spec §4.4, §6).
///
/// `reference_boost` is part of the schema for forward compatibility but is
/// not read by the Store's reference-increment operation in this
/// implementation (Open Question 1, resolved in favor of preserving exact
/// current semantics — see SPEC_FULL §9).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DecayConfig {
    pub daily_rate: f64,
    pub reference_boost: f64,
    pub gc_threshold: f64,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            daily_rate: 0.05,
            reference_boost: 0.1,
            gc_threshold: 0.1,
        }
    }
}

impl DecayConfig {
    pub fn validate(&mut self) {
        if !(0.0..=1.0).contains(&self.daily_rate) {
            warn!(value = self.daily_rate, "decay.dailyRate out of range [0,1], using default");
            self.daily_rate = Self::default().daily_rate;
        }
        if !(0.0..=1.0).contains(&self.reference_boost) {
            warn!(value = self.reference_boost, "decay.referenceBoost out of range [0,1], using default");
            self.reference_boost = Self::default().reference_boost;
        }
        if !(0.0..=1.0).contains(&self.gc_threshold) {
            warn!(value = self.gc_threshold, "decay.gcThreshold out of range [0,1], using default");
            self.gc_threshold = Self::default().gc_threshold;
        }
    }
}
