//! Entity types for the data model (spec §3).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Edit,
    Create,
    Test,
    Build,
    Commit,
    Delete,
    Other,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Edit => "edit",
            ActionType::Create => "create",
            ActionType::Test => "test",
            ActionType::Build => "build",
            ActionType::Commit => "commit",
            ActionType::Delete => "delete",
            ActionType::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "edit" => ActionType::Edit,
            "create" => ActionType::Create,
            "test" => ActionType::Test,
            "build" => ActionType::Build,
            "commit" => ActionType::Commit,
            "delete" => ActionType::Delete,
            _ => ActionType::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
        }
    }

    pub fn parse(s: &str) -> Self {
        if s == "failure" { Outcome::Failure } else { Outcome::Success }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapshotTrigger {
    PreCompact,
    Compact,
    Other,
}

impl SnapshotTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotTrigger::PreCompact => "pre-compact",
            SnapshotTrigger::Compact => "compact",
            SnapshotTrigger::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "pre-compact" => SnapshotTrigger::PreCompact,
            "compact" => SnapshotTrigger::Compact,
            _ => SnapshotTrigger::Other,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub project_path: String,
    pub started_at: String,
    pub ended_at: Option<String>,
    pub summary: Option<String>,
    pub task_description: Option<String>,
    pub files_modified: Vec<String>,
    pub compaction_count: i64,
    pub context_utilization_peak: Option<f64>,
    pub parent_session_id: Option<String>,
}

/// Allow-listed fields `update_session` may touch (spec §9 Design Notes:
/// allow-list driven column filter, not reflection).
#[derive(Debug, Clone, Default)]
pub struct SessionPartial {
    pub ended_at: Option<String>,
    pub summary: Option<String>,
    pub task_description: Option<String>,
    pub files_modified: Option<Vec<String>>,
    pub compaction_count: Option<i64>,
    pub context_utilization_peak: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Action {
    pub session_id: String,
    pub timestamp: String,
    pub tool_name: String,
    pub file_path: Option<String>,
    pub action_type: ActionType,
    pub description: String,
    pub outcome: Outcome,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Decision {
    pub id: i64,
    pub session_id: String,
    pub project_path: String,
    pub timestamp: String,
    pub category: String,
    pub decision: String,
    pub rationale: Option<String>,
    pub files_affected: Vec<String>,
    pub supersedes_id: Option<i64>,
}

impl Decision {
    pub fn new(
        session_id: impl Into<String>,
        project_path: impl Into<String>,
        timestamp: impl Into<String>,
        category: impl Into<String>,
        decision: impl Into<String>,
        rationale: Option<String>,
        files_affected: Vec<String>,
    ) -> Self {
        Self {
            id: 0,
            session_id: session_id.into(),
            project_path: project_path.into(),
            timestamp: timestamp.into(),
            category: category.into(),
            decision: decision.into(),
            rationale,
            files_affected,
            supersedes_id: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Learning {
    pub id: i64,
    pub session_id: String,
    pub project_path: String,
    pub timestamp: String,
    pub category: String,
    pub learning: String,
    pub context: Option<String>,
    pub relevance_score: f64,
    pub times_referenced: i64,
}

impl Learning {
    pub fn new(
        session_id: impl Into<String>,
        project_path: impl Into<String>,
        timestamp: impl Into<String>,
        category: impl Into<String>,
        learning: impl Into<String>,
        context: Option<String>,
    ) -> Self {
        Self {
            id: 0,
            session_id: session_id.into(),
            project_path: project_path.into(),
            timestamp: timestamp.into(),
            category: category.into(),
            learning: learning.into(),
            context,
            relevance_score: 1.0,
            times_referenced: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub id: i64,
    pub session_id: String,
    pub timestamp: String,
    pub trigger: SnapshotTrigger,
    pub current_task: Option<String>,
    pub progress_summary: Option<String>,
    pub open_questions: Vec<String>,
    pub next_steps: Vec<String>,
    pub working_files: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Metric {
    pub session_id: String,
    pub timestamp: String,
    pub metric_name: String,
    pub metric_value: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectMetrics {
    pub session_count: i64,
    pub total_actions: i64,
    pub total_failures: i64,
    pub avg_peak_utilization: f64,
    pub total_compactions: i64,
    pub decision_count: i64,
    pub learning_count: i64,
    pub prompt_count: i64,
}

#[derive(Debug, Clone)]
pub struct Prompt {
    pub id: i64,
    pub session_id: String,
    pub project_path: String,
    pub timestamp: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchCategory {
    Sessions,
    Decisions,
    Learnings,
    All,
}

impl SearchCategory {
    pub fn parse(s: &str) -> Self {
        match s {
            "sessions" => SearchCategory::Sessions,
            "decisions" => SearchCategory::Decisions,
            "learnings" => SearchCategory::Learnings,
            _ => SearchCategory::All,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchHit {
    pub source: &'static str,
    pub row_id: i64,
    pub snippet: String,
    pub rank: f64,
}

/// Serialize a list of strings as the JSON-array column representation used
/// throughout the schema (files_modified, files_affected, open_questions,
/// next_steps, working_files).
pub fn json_array(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

/// Parse a stored JSON-array column back into a `Vec<String>`. Falls back to
/// splitting on newlines on malformed JSON (spec §4.5's snapshot
/// `next_steps` fallback generalized to every JSON-array column for
/// consistency) rather than silently dropping data.
pub fn parse_json_array(raw: &str) -> Vec<String> {
    serde_json::from_str::<Vec<String>>(raw).unwrap_or_else(|_| {
        raw.lines().map(|l| l.trim().to_string()).filter(|l| !l.is_empty()).collect()
    })
}
