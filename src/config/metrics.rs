use serde::{Deserialize, Serialize};
use tracing::warn;

/// Settings for utilization advisories (spec §4.6, §6).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MetricsConfig {
    pub enabled: bool,
    pub warn_utilization: f64,
    pub critical_utilization: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            warn_utilization: 0.7,
            critical_utilization: 0.9,
        }
    }
}

impl MetricsConfig {
    /// Clamp both thresholds to 0..1 and enforce `critical > warn`, falling
    /// back to the default pair when the relationship is violated.
    pub fn validate(&mut self) {
        if !(0.0..=1.0).contains(&self.warn_utilization) {
            warn!(value = self.warn_utilization, "metrics.warnUtilization out of range [0,1], using default");
            self.warn_utilization = Self::default().warn_utilization;
        }
        if !(0.0..=1.0).contains(&self.critical_utilization) {
            warn!(value = self.critical_utilization, "metrics.criticalUtilization out of range [0,1], using default");
            self.critical_utilization = Self::default().critical_utilization;
        }
        if self.critical_utilization <= self.warn_utilization {
            warn!(
                warn = self.warn_utilization,
                critical = self.critical_utilization,
                "metrics.criticalUtilization must exceed warnUtilization, using defaults"
            );
            let d = Self::default();
            self.warn_utilization = d.warn_utilization;
            self.critical_utilization = d.critical_utilization;
        }
    }
}
