//! Per-command handler bodies (spec §4.7 "Handler specifics").

use super::stopwords;
use super::{HookEvent, HookResponse};
use crate::analyzer;
use crate::config::Config;
use crate::injector::{self, StartSource};
use crate::store::{
    Action, ActionType, Learning, Metric, Outcome, Prompt, SearchCategory, SessionPartial, Snapshot,
    SnapshotTrigger, Store,
};
use crate::summarizer;
use crate::utilization;
use serde_json::Value;

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

pub async fn session_start(store: &Store, event: &HookEvent, config: &Config) -> HookResponse {
    let session_id = event.session_id_or_unknown();
    let project_path = event.project_path_or_unknown();
    store.create_session(&session_id, &project_path, None).await;

    store.decay_learnings(config.decay.daily_rate).await;
    store.garbage_collect_learnings(config.decay.gc_threshold).await;

    if !config.injection.enabled {
        return HookResponse::neutral();
    }

    let source = StartSource::parse(event.source.as_deref().unwrap_or(""));
    let brief = injector::build_context_brief(store, &project_path, &session_id, source, &config.injection).await;

    if brief.is_empty() {
        HookResponse::neutral()
    } else {
        HookResponse::with_output(Some(brief), None)
    }
}

pub async fn capture_action(store: &Store, event: &HookEvent, config: &Config) -> HookResponse {
    let tool_name = event.tool_name.clone().unwrap_or_default();
    if !config.capture.should_capture(&tool_name) {
        return HookResponse::neutral();
    }

    let session_id = event.session_id_or_unknown();
    let project_path = event.project_path_or_unknown();
    let (action_type, file_path, description) = classify_action(&tool_name, &event.tool_input);
    let outcome = derive_outcome(&event.tool_output);
    let error_message = if outcome == Outcome::Failure { Some(stringify(&event.tool_output)) } else { None };

    let action = Action {
        session_id,
        timestamp: now_rfc3339(),
        tool_name,
        file_path,
        action_type,
        description,
        outcome,
        error_message,
    };

    store.insert_action(&action).await;

    if let Some(decision) = analyzer::analyze_action(&action, &project_path) {
        store.insert_decision(&decision).await;
    }

    HookResponse::neutral()
}

pub async fn user_prompt(store: &Store, event: &HookEvent, config: &Config) -> HookResponse {
    let session_id = event.session_id_or_unknown();
    let project_path = event.project_path_or_unknown();
    let prompt_text = event.prompt.clone().unwrap_or_default();

    if !prompt_text.is_empty() {
        store
            .insert_prompt(&Prompt {
                id: 0,
                session_id: session_id.clone(),
                project_path: project_path.clone(),
                timestamp: now_rfc3339(),
                prompt: prompt_text.clone(),
            })
            .await;
    }

    let mut advisories: Vec<String> = Vec::new();

    let query = stopwords::build_query(&prompt_text);
    if !query.is_empty() {
        let hits = store.find_similar_prompts(&query, &project_path, Some(&session_id), 5).await;
        if let Some(best) = hits.iter().min_by(|a, b| a.rank.partial_cmp(&b.rank).unwrap_or(std::cmp::Ordering::Equal)) {
            if best.rank < -1.0 {
                advisories.push(format!(
                    "This looks similar to a previous prompt: \"{}\"",
                    best.prompt.prompt
                ));
            }
        }
    }

    if config.metrics.enabled {
        if let Some(transcript_path) = &event.transcript_path {
            let util = utilization::estimate_utilization(std::path::Path::new(transcript_path));
            if util.utilization >= config.metrics.critical_utilization {
                advisories.push(format!(
                    "Context utilization critical: {:.0}% of window used.",
                    util.utilization * 100.0
                ));
            } else if util.utilization >= config.metrics.warn_utilization {
                advisories.push(format!(
                    "Context utilization high: {:.0}% of window used.",
                    util.utilization * 100.0
                ));
            }
        }
    }

    if advisories.is_empty() {
        HookResponse::neutral()
    } else {
        HookResponse::with_output(None, Some(advisories.join(" ")))
    }
}

pub async fn pre_compact(store: &Store, event: &HookEvent) -> HookResponse {
    let session_id = event.session_id_or_unknown();
    let actions = store.session_actions(&session_id).await;

    let counts = summarizer::count_by_type(&actions);
    let progress_summary = if counts.is_empty() {
        None
    } else {
        Some(
            counts
                .iter()
                .map(|(t, n)| format!("{n} {}", t.as_str()))
                .collect::<Vec<_>>()
                .join(", "),
        )
    };
    let working_files = summarizer::unique_files(&actions);

    store
        .record_precompact_snapshot(&Snapshot {
            id: 0,
            session_id: session_id.clone(),
            timestamp: now_rfc3339(),
            trigger: SnapshotTrigger::PreCompact,
            current_task: None,
            progress_summary,
            open_questions: Vec::new(),
            next_steps: Vec::new(),
            working_files,
        })
        .await;

    HookResponse::neutral()
}

pub async fn session_stop(store: &Store, event: &HookEvent) -> HookResponse {
    let session_id = event.session_id_or_unknown();
    let project_path = event.project_path_or_unknown();
    let actions = store.session_actions(&session_id).await;

    let summary = summarizer::summarize(&actions);
    let files = summarizer::unique_files(&actions);

    for learning in analyzer::extract_learnings(&actions, &session_id, &project_path) {
        store.insert_learning(&learning).await;
    }

    let mut context_peak = None;
    if let Some(transcript_path) = &event.transcript_path {
        let util = utilization::estimate_utilization(std::path::Path::new(transcript_path));
        store
            .insert_metric(&Metric {
                session_id: session_id.clone(),
                timestamp: now_rfc3339(),
                metric_name: "context_utilization".to_string(),
                metric_value: util.utilization,
            })
            .await;

        let current_peak = store.get_session(&session_id).await.and_then(|s| s.context_utilization_peak);
        if current_peak.is_none_or(|peak| util.utilization > peak) {
            context_peak = Some(util.utilization);
        }
    }

    store
        .update_session(
            &session_id,
            SessionPartial {
                summary: Some(summary),
                files_modified: Some(files),
                ended_at: Some(now_rfc3339()),
                context_utilization_peak: context_peak,
                ..Default::default()
            },
        )
        .await;

    HookResponse::neutral()
}

/// Defense in depth for when `Stop` did not run; idempotent (P10) — only
/// fields that are still missing are filled in.
pub async fn session_end(store: &Store, event: &HookEvent) -> HookResponse {
    let session_id = event.session_id_or_unknown();
    let Some(session) = store.get_session(&session_id).await else {
        return HookResponse::neutral();
    };

    if session.summary.is_some() && session.ended_at.is_some() && !session.files_modified.is_empty() {
        return HookResponse::neutral();
    }

    let actions = store.session_actions(&session_id).await;
    let partial = SessionPartial {
        summary: if session.summary.is_none() { Some(summarizer::summarize(&actions)) } else { None },
        files_modified: if session.files_modified.is_empty() { Some(summarizer::unique_files(&actions)) } else { None },
        ended_at: if session.ended_at.is_none() { Some(now_rfc3339()) } else { None },
        ..Default::default()
    };
    store.update_session(&session_id, partial).await;

    HookResponse::neutral()
}

pub async fn query(store: &Store, args: &[String]) -> HookResponse {
    let Some(text) = args.first().filter(|s| !s.trim().is_empty()) else {
        return HookResponse::with_output(Some("Error: query requires a non-empty search term.".to_string()), None);
    };

    let hits = store.search_memory(text, SearchCategory::All, 10).await;
    if hits.is_empty() {
        return HookResponse::with_output(Some(format!("No results for \"{text}\".")), None);
    }

    let mut lines = Vec::new();
    for (i, hit) in hits.iter().enumerate() {
        lines.push(format!("{}. [{}#{}] {}", i + 1, hit.source, hit.row_id, hit.snippet));
    }

    HookResponse::with_output(Some(lines.join("\n")), None)
}

pub async fn stats(store: &Store, event: &HookEvent, args: &[String]) -> HookResponse {
    let project_path = event.project_path_or_unknown();
    let session_only = args.iter().any(|a| a == "--session");
    let project_only = args.iter().any(|a| a == "--project");

    let mut lines = Vec::new();

    if !project_only {
        let session_id = event.session_id_or_unknown();
        let actions = store.session_actions(&session_id).await;
        lines.push(format!("Session {session_id}: {} actions", actions.len()));
    }

    if !session_only {
        let metrics = store.project_metrics(&project_path).await;
        lines.push(format!(
            "Project {project_path}: {} sessions, {} actions ({} failed), {} decisions, {} learnings, {} prompts",
            metrics.session_count,
            metrics.total_actions,
            metrics.total_failures,
            metrics.decision_count,
            metrics.learning_count,
            metrics.prompt_count
        ));
    }

    HookResponse::with_output(Some(lines.join("\n")), None)
}

pub async fn gc(store: &Store, config: &Config) -> HookResponse {
    let rate = config.decay.daily_rate;
    store.decay_learnings(rate).await;
    let removed = store.garbage_collect_learnings(config.decay.gc_threshold).await;

    HookResponse::with_output(
        Some(format!("Applied {:.1}% decay; removed {removed} learning(s) below threshold.", rate * 100.0)),
        None,
    )
}

pub async fn export(store: &Store, event: &HookEvent) -> HookResponse {
    let project_path = event.project_path_or_unknown();
    let sessions = store.recent_sessions(&project_path, 10_000).await;
    let decisions = store.active_decisions(&project_path, 10_000).await;
    let learnings = store.top_learnings(&project_path, 10_000).await;

    let document = serde_json::json!({
        "sessions": sessions,
        "decisions": decisions.iter().map(decision_to_json).collect::<Vec<_>>(),
        "learnings": learnings.iter().map(learning_to_json).collect::<Vec<_>>(),
    });

    HookResponse::with_output(Some(document.to_string()), None)
}

pub async fn backup(store: &Store, db_path: &std::path::Path) -> HookResponse {
    store.close().await;

    let timestamp = now_rfc3339().replace(':', "-");
    let backups_dir = crate::config::backups_dir();
    if std::fs::create_dir_all(&backups_dir).is_err() {
        return HookResponse::with_output(Some("Backup failed: could not create backups directory.".to_string()), None);
    }

    let file_name = db_path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_else(|| "memory.db".to_string());
    let dest = backups_dir.join(format!("{timestamp}-{file_name}"));

    match std::fs::copy(db_path, &dest) {
        Ok(_) => HookResponse::with_output(Some(format!("Backup written to {}", dest.display())), None),
        Err(err) => HookResponse::with_output(Some(format!("Backup failed: {err}")), None),
    }
}

fn decision_to_json(d: &crate::store::Decision) -> Value {
    serde_json::json!({
        "id": d.id, "session_id": d.session_id, "project_path": d.project_path,
        "timestamp": d.timestamp, "category": d.category, "decision": d.decision,
        "rationale": d.rationale, "files_affected": d.files_affected, "supersedes_id": d.supersedes_id,
    })
}

fn learning_to_json(l: &Learning) -> Value {
    serde_json::json!({
        "id": l.id, "session_id": l.session_id, "project_path": l.project_path,
        "timestamp": l.timestamp, "category": l.category, "learning": l.learning,
        "context": l.context, "relevance_score": l.relevance_score, "times_referenced": l.times_referenced,
    })
}

fn classify_action(tool_name: &str, tool_input: &Value) -> (ActionType, Option<String>, String) {
    let file_path = tool_input.get("file_path").and_then(Value::as_str).map(String::from);
    let command = tool_input.get("command").and_then(Value::as_str).unwrap_or("");

    let action_type = match tool_name {
        "Write" => ActionType::Create,
        "Edit" | "MultiEdit" | "NotebookEdit" => ActionType::Edit,
        "Bash" => classify_bash_command(command),
        _ => ActionType::Other,
    };

    let description = if !command.is_empty() {
        command.to_string()
    } else {
        tool_input
            .get("description")
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| tool_name.to_string())
    };

    (action_type, file_path, description)
}

fn classify_bash_command(command: &str) -> ActionType {
    let lower = command.to_ascii_lowercase();
    if lower.contains("rm ") || lower.contains("rm -") {
        ActionType::Delete
    } else if lower.contains("git commit") {
        ActionType::Commit
    } else if lower.contains("test") {
        ActionType::Test
    } else if lower.contains("build") || lower.contains("compile") || lower.contains("tsc") {
        ActionType::Build
    } else {
        ActionType::Other
    }
}

fn derive_outcome(tool_output: &Value) -> Outcome {
    let text = stringify(tool_output);
    if text.to_ascii_lowercase().contains("error") {
        Outcome::Failure
    } else {
        Outcome::Success
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
