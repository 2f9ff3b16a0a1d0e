//! Router (spec §4.7): wires a single hook invocation's stdin/stdout
//! envelope around the handlers in [`handlers`].
//!
//! Every public entry point here is infallible from the caller's
//! perspective — handler errors are downgraded to the neutral response
//! inside `dispatch`, and the one `catch_unwind` boundary lives in the
//! `mira-hook` binary itself, not here, so this module stays ordinary async
//! Rust.

pub(crate) mod handlers;
mod stopwords;

use crate::config::Config;
use crate::store::Store;
use serde::Serialize;
use serde_json::Value;

/// Parsed hook input (spec §6). Every field but `session_id` is optional in
/// practice; absence is represented here, not defaulted, so handlers can
/// tell "missing" from "empty string".
#[derive(Debug, Clone, Default)]
pub struct HookEvent {
    pub session_id: Option<String>,
    pub transcript_path: Option<String>,
    pub cwd: Option<String>,
    pub hook_event_name: Option<String>,
    pub tool_name: Option<String>,
    pub tool_input: Value,
    pub tool_output: Value,
    pub source: Option<String>,
    /// The submitted prompt text on `UserPromptSubmit` events. Not listed
    /// among spec §6's named fields, but required for the `user-prompt`
    /// handler to have anything to search on — read the same way the host
    /// integration actually sends it.
    pub prompt: Option<String>,
}

impl HookEvent {
    /// Parse raw stdin as JSON. Empty or malformed input becomes an empty
    /// event rather than an error (spec §4.7 step 1, §7 ParseError policy).
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(value),
            Err(_) => Self::default(),
        }
    }

    fn from_value(value: Value) -> Self {
        let str_field = |key: &str| value.get(key).and_then(Value::as_str).map(String::from);
        Self {
            session_id: str_field("session_id"),
            transcript_path: str_field("transcript_path"),
            cwd: str_field("cwd"),
            hook_event_name: str_field("hook_event_name"),
            tool_name: str_field("tool_name"),
            tool_input: value.get("tool_input").cloned().unwrap_or(Value::Null),
            tool_output: value.get("tool_output").cloned().unwrap_or(Value::Null),
            source: str_field("source"),
            prompt: str_field("prompt"),
        }
    }

    /// Session id or the "unknown" sentinel (spec §4.8 applies the same
    /// sentinel to the tool server; the router tolerates the same absence).
    pub fn session_id_or_unknown(&self) -> String {
        self.session_id.clone().unwrap_or_else(|| "unknown".to_string())
    }

    /// Project path derived from the host-supplied working directory.
    pub fn project_path_or_unknown(&self) -> String {
        self.cwd.clone().unwrap_or_else(|| "unknown".to_string())
    }
}

#[derive(Debug, Serialize, Default)]
pub struct HookResponse {
    #[serde(rename = "continue")]
    pub continue_: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook_specific_output: Option<HookSpecificOutput>,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HookSpecificOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook_event_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_message: Option<String>,
}

impl HookResponse {
    pub fn neutral() -> Self {
        Self { continue_: true, hook_specific_output: None }
    }

    pub(crate) fn with_output(additional_context: Option<String>, system_message: Option<String>) -> Self {
        if additional_context.is_none() && system_message.is_none() {
            return Self::neutral();
        }
        Self {
            continue_: true,
            hook_specific_output: Some(HookSpecificOutput { hook_event_name: None, additional_context, system_message }),
        }
    }

    /// Always writes valid JSON terminated by a newline (P5).
    pub fn to_json_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{\"continue\":true}".to_string())
    }
}

/// Dispatches one command against one event, opening and closing the store
/// for the lifetime of the call (spec §4.7 steps 4-7).
pub async fn dispatch(command: &str, args: &[String], event: HookEvent, db_path: &std::path::Path) -> HookResponse {
    let mut config = Config::load();
    config.validate();

    let store = match Store::open(db_path).await {
        Ok(store) => store,
        Err(err) => {
            tracing::error!(error = %err, "failed to open store");
            return HookResponse::neutral();
        }
    };

    let mut response = match command {
        "session-start" => handlers::session_start(&store, &event, &config).await,
        "user-prompt" => handlers::user_prompt(&store, &event, &config).await,
        "capture-action" => handlers::capture_action(&store, &event, &config).await,
        "pre-compact" => handlers::pre_compact(&store, &event).await,
        "session-stop" => handlers::session_stop(&store, &event).await,
        "session-end" => handlers::session_end(&store, &event).await,
        "query" => handlers::query(&store, args).await,
        "stats" => handlers::stats(&store, &event, args).await,
        "gc" => handlers::gc(&store, &config).await,
        "export" => handlers::export(&store, &event).await,
        "backup" => handlers::backup(&store, db_path).await,
        _ => HookResponse::with_output(Some(format!("Unknown command: {command}")), None),
    };

    if let Some(output) = response.hook_specific_output.as_mut() {
        output.hook_event_name = event.hook_event_name.clone();
    }

    store.close().await;
    response
}
