//! Tool server (spec §4.8): a long-lived process exposing `search`,
//! `record_decision`, `record_learning`, and `metrics` over newline-delimited
//! JSON on stdin/stdout. Framing beyond "one JSON object per line" is the
//! host integration's concern and out of scope here (spec §6).

use crate::store::{Decision, Learning, SearchCategory, Store};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct Request {
    tool: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Serialize)]
struct Response {
    content: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    is_error: bool,
}

impl Response {
    fn ok(content: String) -> Self {
        Self { content, is_error: false }
    }

    fn error(content: String) -> Self {
        Self { content, is_error: true }
    }
}

/// Ambient identifiers read once at process start (spec §4.8). "unknown" is
/// an allowed sentinel for either.
pub struct AmbientContext {
    pub project_path: String,
    pub session_id: String,
}

impl AmbientContext {
    pub fn from_env() -> Self {
        Self {
            project_path: std::env::var("MIRA_MEMORY_PROJECT_PATH").unwrap_or_else(|_| "unknown".to_string()),
            session_id: std::env::var("MIRA_MEMORY_SESSION_ID").unwrap_or_else(|_| "unknown".to_string()),
        }
    }
}

/// Handles a single request line, returning the response line to write back.
pub async fn handle_line(store: &Store, ctx: &AmbientContext, line: &str) -> String {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(err) => {
            return serialize(&Response::error(format!("malformed request: {err}")));
        }
    };

    let response = match request.tool.as_str() {
        "search" => search(store, &request.args).await,
        "record_decision" => record_decision(store, ctx, &request.args).await,
        "record_learning" => record_learning(store, ctx, &request.args).await,
        "metrics" => metrics(store, ctx, &request.args).await,
        other => Response::error(format!("unknown tool: {other}")),
    };

    serialize(&response)
}

fn serialize(response: &Response) -> String {
    serde_json::to_string(response).unwrap_or_else(|_| r#"{"content":"internal error","is_error":true}"#.to_string())
}

async fn search(store: &Store, args: &Value) -> Response {
    let query = args.get("query").and_then(Value::as_str).unwrap_or("");
    if query.trim().is_empty() {
        return Response::error("query must not be empty".to_string());
    }
    let category = args.get("category").and_then(Value::as_str).map(SearchCategory::parse).unwrap_or(SearchCategory::All);
    let limit = args.get("limit").and_then(Value::as_u64).unwrap_or(5) as u32;

    let hits = store.search_memory(query, category, limit).await;
    for hit in &hits {
        if hit.source == "learning" {
            store.increment_learning_reference(hit.row_id).await;
        }
    }

    if hits.is_empty() {
        return Response::ok(format!("No results for \"{query}\"."));
    }

    let mut lines = Vec::new();
    for (i, hit) in hits.iter().enumerate() {
        lines.push(format!("{}. [{}#{}] {}", i + 1, hit.source, hit.row_id, hit.snippet));
    }
    Response::ok(lines.join("\n"))
}

async fn record_decision(store: &Store, ctx: &AmbientContext, args: &Value) -> Response {
    let Some(decision_text) = args.get("decision").and_then(Value::as_str) else {
        return Response::error("decision is required".to_string());
    };
    let rationale = args.get("rationale").and_then(Value::as_str).map(String::from);
    let category = args.get("category").and_then(Value::as_str).unwrap_or("general").to_string();
    let files_affected = args
        .get("files_affected")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(Value::as_str).map(String::from).collect())
        .unwrap_or_default();

    store.create_session(&ctx.session_id, &ctx.project_path, None).await;

    let decision = Decision::new(
        ctx.session_id.clone(),
        ctx.project_path.clone(),
        chrono::Utc::now().to_rfc3339(),
        category,
        decision_text,
        rationale,
        files_affected,
    );
    let id = store.insert_decision(&decision).await;

    Response::ok(format!("Recorded decision #{id}."))
}

async fn record_learning(store: &Store, ctx: &AmbientContext, args: &Value) -> Response {
    let Some(learning_text) = args.get("learning").and_then(Value::as_str) else {
        return Response::error("learning is required".to_string());
    };
    let category = args.get("category").and_then(Value::as_str).unwrap_or("general").to_string();
    let context = args.get("context").and_then(Value::as_str).map(String::from);

    store.create_session(&ctx.session_id, &ctx.project_path, None).await;

    let learning = Learning::new(
        ctx.session_id.clone(),
        ctx.project_path.clone(),
        chrono::Utc::now().to_rfc3339(),
        category,
        learning_text,
        context,
    );
    let id = store.insert_learning(&learning).await;

    Response::ok(format!("Recorded learning #{id} (relevance 1.0)."))
}

async fn metrics(store: &Store, ctx: &AmbientContext, args: &Value) -> Response {
    let period = args.get("period").and_then(Value::as_str).unwrap_or("session");

    match period {
        "session" => {
            let actions = store.session_actions(&ctx.session_id).await;
            let failures = actions.iter().filter(|a| a.outcome == crate::store::Outcome::Failure).count();
            let counts = crate::summarizer::count_by_type(&actions);
            let breakdown = counts.iter().map(|(t, n)| format!("{}: {n}", t.as_str())).collect::<Vec<_>>().join(", ");
            Response::ok(format!("Session actions: {} ({failures} failed). {breakdown}", actions.len()))
        }
        "day" | "week" => {
            let limit = if period == "day" { 10 } else { 50 };
            let sessions = store.recent_sessions(&ctx.project_path, limit).await;
            let mut total_actions = 0usize;
            let mut total_failures = 0usize;
            for session in &sessions {
                let actions = store.session_actions(&session.id).await;
                total_failures += actions.iter().filter(|a| a.outcome == crate::store::Outcome::Failure).count();
                total_actions += actions.len();
            }
            Response::ok(format!(
                "Last {} sessions: {total_actions} actions, {total_failures} failures.",
                sessions.len()
            ))
        }
        other => Response::error(format!("unknown period: {other}")),
    }
}
