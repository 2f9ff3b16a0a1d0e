use serde::{Deserialize, Serialize};
use tracing::warn;

/// Settings for the context-brief injector (spec §4.5, §6).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct InjectionConfig {
    pub enabled: bool,
    pub max_tokens: u32,
    pub include_sessions: u32,
    pub include_decisions: bool,
    pub include_learnings: bool,
    pub include_snapshot: bool,
}

impl Default for InjectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_tokens: 2000,
            include_sessions: 3,
            include_decisions: true,
            include_learnings: true,
            include_snapshot: true,
        }
    }
}

impl InjectionConfig {
    /// Clamp `maxTokens` to 100..10000 and `includeSessions` to 0..20,
    /// warning and substituting the default on out-of-range values.
    pub fn validate(&mut self) {
        if !(100..=10000).contains(&self.max_tokens) {
            warn!(
                value = self.max_tokens,
                "injection.maxTokens out of range [100,10000], using default"
            );
            self.max_tokens = Self::default().max_tokens;
        }
        if self.include_sessions > 20 {
            warn!(
                value = self.include_sessions,
                "injection.includeSessions out of range [0,20], using default"
            );
            self.include_sessions = Self::default().include_sessions;
        }
    }
}
