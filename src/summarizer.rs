//! Deterministic, rule-based session summarization (spec §4.2).
//!
//! No LLM calls here — the teacher's `session/summary_generator.rs` shells
//! out to a model; this module never does, since the router must complete
//! within its latency budget without waiting on a remote call (spec §4.2,
//! §5).

use crate::store::{Action, ActionType, Outcome};
use std::collections::BTreeSet;

const EMPTY_SESSION_SUMMARY: &str = "No recorded actions.";
const SCOPE_FILE_LIMIT: usize = 8;

/// Builds a 2-3 sentence human-readable summary of what a session did, from
/// its recorded actions alone: an activity sentence, an optional outcome
/// sentence (failures, test pass/fail ratio, build result, commit messages),
/// and an optional scope sentence naming up to two touched files.
pub fn summarize(actions: &[Action]) -> String {
    if actions.is_empty() {
        return EMPTY_SESSION_SUMMARY.to_string();
    }

    let files = unique_files(actions);
    let counts = count_by_type(actions);
    let failures = actions.iter().filter(|a| a.outcome == Outcome::Failure).count();

    let mut sentences = vec![activity_sentence(&counts, files.len())];
    if let Some(outcome) = outcome_sentence(actions, &counts, failures) {
        sentences.push(outcome);
    }
    if let Some(scope) = scope_sentence(&files) {
        sentences.push(scope);
    }
    sentences.join(" ")
}

/// Files touched, deduplicated and in first-seen order collapsed to sorted
/// order (stable across runs — matters for snippet diffing in tests).
pub fn unique_files(actions: &[Action]) -> Vec<String> {
    let set: BTreeSet<&str> = actions.iter().filter_map(|a| a.file_path.as_deref()).collect();
    set.into_iter().map(String::from).collect()
}

pub fn count_by_type(actions: &[Action]) -> std::collections::BTreeMap<ActionType, usize> {
    let mut counts = std::collections::BTreeMap::new();
    for action in actions {
        *counts.entry(action.action_type).or_insert(0) += 1;
    }
    counts
}

fn activity_sentence(counts: &std::collections::BTreeMap<ActionType, usize>, file_count: usize) -> String {
    let mut type_summary: Vec<String> = Vec::new();
    for action_type in [
        ActionType::Edit,
        ActionType::Create,
        ActionType::Delete,
        ActionType::Test,
        ActionType::Build,
        ActionType::Commit,
        ActionType::Other,
    ] {
        if let Some(count) = counts.get(&action_type) {
            type_summary.push(format!("{} {}", count, plural_label(action_type, *count)));
        }
    }

    if file_count > 0 {
        format!(
            "Session performed {} across {} file{}.",
            type_summary.join(", "),
            file_count,
            if file_count == 1 { "" } else { "s" }
        )
    } else {
        format!("Session performed {}.", type_summary.join(", "))
    }
}

/// Failure counts, test pass/fail ratio, build outcome, and the first two
/// commit messages — absent entirely when none of those apply.
fn outcome_sentence(
    actions: &[Action],
    counts: &std::collections::BTreeMap<ActionType, usize>,
    failures: usize,
) -> Option<String> {
    let mut clauses: Vec<String> = Vec::new();

    if failures > 0 {
        clauses.push(format!("{} action{} failed", failures, if failures == 1 { "" } else { "s" }));
    }

    if let Some(&test_total) = counts.get(&ActionType::Test) {
        let passed = actions
            .iter()
            .filter(|a| a.action_type == ActionType::Test && a.outcome == Outcome::Success)
            .count();
        clauses.push(format!("tests passed {passed}/{test_total}"));
    }

    if counts.contains_key(&ActionType::Build) {
        let build_failed = actions.iter().any(|a| a.action_type == ActionType::Build && a.outcome == Outcome::Failure);
        clauses.push(format!("build {}", if build_failed { "failed" } else { "succeeded" }));
    }

    let commit_messages: Vec<&str> =
        actions.iter().filter(|a| a.action_type == ActionType::Commit).map(|a| a.description.as_str()).take(2).collect();
    if !commit_messages.is_empty() {
        clauses.push(format!("commits: {}", commit_messages.join("; ")));
    }

    if clauses.is_empty() {
        return None;
    }

    Some(capitalize_first(&format!("{}.", clauses.join(", "))))
}

/// Up to two file basenames, only when fewer than [`SCOPE_FILE_LIMIT`] files
/// were touched in total — past that, naming two of many is misleading.
fn scope_sentence(files: &[String]) -> Option<String> {
    if files.is_empty() || files.len() >= SCOPE_FILE_LIMIT {
        return None;
    }
    let basenames: Vec<&str> = files.iter().map(|f| basename(f)).take(2).collect();
    Some(format!("Primarily touched {}.", basenames.join(" and ")))
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn plural_label(action_type: ActionType, count: usize) -> &'static str {
    match (action_type, count == 1) {
        (ActionType::Edit, true) => "edit",
        (ActionType::Edit, false) => "edits",
        (ActionType::Create, true) => "file created",
        (ActionType::Create, false) => "files created",
        (ActionType::Delete, true) => "file deleted",
        (ActionType::Delete, false) => "files deleted",
        (ActionType::Test, true) => "test run",
        (ActionType::Test, false) => "test runs",
        (ActionType::Build, true) => "build",
        (ActionType::Build, false) => "builds",
        (ActionType::Commit, true) => "commit",
        (ActionType::Commit, false) => "commits",
        (ActionType::Other, true) => "other action",
        (ActionType::Other, false) => "other actions",
    }
}
