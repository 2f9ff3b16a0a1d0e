//! Context injector (spec §4.5): assembles the markdown brief injected at
//! session start, under a strict token budget.

use crate::config::InjectionConfig;
use crate::store::{Snapshot, Store};
use crate::tokens::{estimate_tokens, truncate_to_token_budget};

const HEADER: &str = "# Project Memory\n\n";
const ACTIVE_DECISIONS_CAP: u32 = 20;
const TOP_LEARNINGS_LIMIT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartSource {
    Startup,
    Resume,
    Compact,
    Clear,
    Unknown,
}

impl StartSource {
    pub fn parse(s: &str) -> Self {
        match s {
            "startup" => StartSource::Startup,
            "resume" => StartSource::Resume,
            "compact" => StartSource::Compact,
            "clear" => StartSource::Clear,
            _ => StartSource::Unknown,
        }
    }

    fn shows_snapshot(self) -> bool {
        matches!(self, StartSource::Resume | StartSource::Compact)
    }
}

/// Builds the context brief, or an empty string if nothing survives
/// budgeting (P11).
pub async fn build_context_brief(
    store: &Store,
    project_path: &str,
    current_session_id: &str,
    source: StartSource,
    settings: &InjectionConfig,
) -> String {
    let header_tokens = estimate_tokens(HEADER) as i64;
    let mut remaining = settings.max_tokens as i64 - header_tokens;
    if remaining <= 0 {
        return String::new();
    }

    let snapshot_section = if settings.include_snapshot && source.shows_snapshot() {
        match store.latest_project_snapshot(project_path, Some(current_session_id)).await {
            Some(snapshot) => render_snapshot(&snapshot),
            None => String::new(),
        }
    } else {
        String::new()
    };

    let decisions_section = if settings.include_decisions {
        let decisions = store.active_decisions(project_path, ACTIVE_DECISIONS_CAP).await;
        if decisions.is_empty() {
            String::new()
        } else {
            let mut section = String::from("## Active Decisions\n");
            for decision in &decisions {
                section.push_str(&format!("- [{}] {}\n", decision.category, decision.decision));
            }
            section.push('\n');
            section
        }
    } else {
        String::new()
    };

    let learnings_section = if settings.include_learnings {
        let learnings = store.top_learnings(project_path, TOP_LEARNINGS_LIMIT).await;
        if learnings.is_empty() {
            String::new()
        } else {
            let mut section = String::from("## Learnings\n");
            for learning in &learnings {
                section.push_str(&format!("- [{}] {}\n", learning.category, learning.learning));
            }
            section.push('\n');
            section
        }
    } else {
        String::new()
    };

    let sessions_section = {
        let sessions = store.recent_summarized_sessions(project_path, settings.include_sessions).await;
        if sessions.is_empty() {
            String::new()
        } else {
            let mut section = String::from("## Recent Sessions\n");
            for session in &sessions {
                let date = session.started_at.split('T').next().unwrap_or(&session.started_at);
                let summary = session.summary.as_deref().unwrap_or("");
                section.push_str(&format!("- {date} {summary}\n"));
            }
            section.push('\n');
            section
        }
    };

    let mut assembled = String::new();
    let mut included_any = false;

    for section in [snapshot_section, decisions_section, learnings_section, sessions_section] {
        if section.is_empty() {
            continue;
        }
        let tokens = estimate_tokens(&section) as i64;
        if tokens <= remaining {
            assembled.push_str(&section);
            remaining -= tokens;
            included_any = true;
        } else {
            let truncated = truncate_to_token_budget(&section, remaining.max(0) as u32);
            if !truncated.is_empty() {
                assembled.push_str(&truncated);
                included_any = true;
            }
            break;
        }
    }

    if !included_any {
        return String::new();
    }

    format!("{HEADER}{assembled}")
}

fn render_snapshot(snapshot: &Snapshot) -> String {
    let mut section = String::from("## Snapshot (Resuming)\n");
    if let Some(task) = &snapshot.current_task {
        section.push_str(&format!("Task: {task}\n"));
    }
    if let Some(progress) = &snapshot.progress_summary {
        section.push_str(&format!("Progress: {progress}\n"));
    }
    if !snapshot.next_steps.is_empty() {
        section.push_str("Next Steps:\n");
        for step in &snapshot.next_steps {
            section.push_str(&format!("- {step}\n"));
        }
    }
    section.push('\n');
    section
}
