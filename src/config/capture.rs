use serde::{Deserialize, Serialize};

/// Settings for PostToolUse capture (spec §4.7, §6, Open Question 2).
///
/// `capture_tools` gates capture: when non-empty, a tool name not in the
/// list is skipped. `async_actions` is accepted and validated but has no
/// effect in this engine's synchronous, one-process-per-event model — there
/// is no deferred capture path to toggle (see SPEC_FULL §9).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CaptureConfig {
    pub enabled: bool,
    pub async_actions: bool,
    pub capture_tools: Vec<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            async_actions: false,
            capture_tools: Vec::new(),
        }
    }
}

impl CaptureConfig {
    /// Whether an observed tool invocation should be persisted.
    pub fn should_capture(&self, tool_name: &str) -> bool {
        self.enabled && (self.capture_tools.is_empty() || self.capture_tools.iter().any(|t| t == tool_name))
    }
}
