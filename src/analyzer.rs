//! Rule-based action analyzer (spec §4.3): maps a single action to implicit
//! decisions, and a full action sequence to learnings. No ML, no heuristics
//! beyond the fixed tables below — reproducibility across processes matters
//! more than recall.

use crate::store::{Action, ActionType, Decision, Learning, Outcome};

/// `(substring pattern, category, decision label)` checked against the
/// action's `file_path`, in order. First match wins.
const CONFIG_FILE_PATTERNS: &[(&str, &str, &str)] = &[
    ("tsconfig.json", "convention", "TypeScript compiler configuration"),
    ("jsconfig.json", "convention", "JavaScript compiler configuration"),
    ("package.json", "library", "Package manifest"),
    (".eslintrc", "convention", "Lint configuration"),
    ("eslint.config", "convention", "Lint configuration"),
    (".prettierrc", "convention", "Format configuration"),
    ("prettier.config", "convention", "Format configuration"),
    ("webpack.config", "architecture", "Bundler configuration"),
    ("vite.config", "architecture", "Bundler configuration"),
    ("rollup.config", "architecture", "Bundler configuration"),
    ("dockerfile", "architecture", "Container configuration"),
    ("docker-compose", "architecture", "Container configuration"),
    (".github/workflows/", "convention", "CI workflow"),
    (".env", "convention", "Environment configuration"),
    ("makefile", "convention", "Build configuration"),
];

const INSTALL_COMMANDS: &[(&str, usize)] = &[
    ("npm install ", 2),
    ("npm i ", 2),
    ("npm add ", 2),
    ("yarn add ", 2),
    ("pnpm add ", 2),
    ("pnpm install ", 2),
];

/// Maps a single recorded action to at most one implicit Decision.
pub fn analyze_action(action: &Action, project_path: &str) -> Option<Decision> {
    if matches!(action.action_type, ActionType::Edit | ActionType::Create) {
        if let Some(path) = &action.file_path {
            if let Some(decision) = config_file_decision(action, project_path, path) {
                return Some(decision);
            }
        }
    }

    if is_shell_tool(&action.tool_name) {
        if let Some(decision) = install_command_decision(action, project_path) {
            return Some(decision);
        }
    }

    None
}

fn is_shell_tool(tool_name: &str) -> bool {
    tool_name.eq_ignore_ascii_case("bash") || tool_name.eq_ignore_ascii_case("shell")
}

fn config_file_decision(action: &Action, project_path: &str, path: &str) -> Option<Decision> {
    let lower = path.to_ascii_lowercase();
    let (_, category, label) = CONFIG_FILE_PATTERNS.iter().find(|(pattern, _, _)| lower.contains(pattern))?;

    Some(Decision {
        id: 0,
        session_id: action.session_id.clone(),
        project_path: project_path.to_string(),
        timestamp: action.timestamp.clone(),
        category: category.to_string(),
        decision: format!("{label} ({path})"),
        rationale: Some(format!("Detected from {} on config file", action.action_type.as_str())),
        files_affected: vec![path.to_string()],
        supersedes_id: None,
    })
}

/// Tokenized-only matching: find the command prefix, split the remainder on
/// whitespace, drop flag tokens (`-` prefixed). No regex fallback — a
/// description that only loosely resembles an install command is not
/// matched.
fn install_command_decision(action: &Action, project_path: &str) -> Option<Decision> {
    let description = &action.description;
    let (prefix, _) = INSTALL_COMMANDS.iter().find(|(prefix, _)| description.contains(prefix))?;
    let start = description.find(prefix)? + prefix.len();
    let packages: Vec<&str> =
        description[start..].split_whitespace().filter(|tok| !tok.starts_with('-')).collect();

    if packages.is_empty() {
        return None;
    }

    Some(Decision {
        id: 0,
        session_id: action.session_id.clone(),
        project_path: project_path.to_string(),
        timestamp: action.timestamp.clone(),
        category: "library".to_string(),
        decision: packages.join(", "),
        rationale: Some("Detected from package manager install command".to_string()),
        files_affected: vec!["package.json".to_string()],
        supersedes_id: None,
    })
}

const LOOKAHEAD: usize = 15;
const ERROR_SNIPPET_MAX: usize = 100;

/// Scans an ordered action list for error→fix sequences (spec §4.3).
pub fn extract_learnings(actions: &[Action], session_id: &str, project_path: &str) -> Vec<Learning> {
    let mut learnings = Vec::new();
    let mut seen_keys: Vec<(ActionType, Vec<String>)> = Vec::new();

    for (i, failure) in actions.iter().enumerate() {
        if failure.outcome != Outcome::Failure {
            continue;
        }
        let is_candidate = matches!(failure.action_type, ActionType::Test | ActionType::Build)
            || failure.file_path.is_some();
        if !is_candidate {
            continue;
        }

        let mut edited_files: Vec<String> = Vec::new();
        let mut fix: Option<&Action> = None;

        for candidate in actions.iter().skip(i + 1).take(LOOKAHEAD) {
            if matches!(candidate.action_type, ActionType::Edit | ActionType::Create) {
                if let Some(path) = &candidate.file_path {
                    edited_files.push(path.clone());
                }
            }

            let same_type_fixed = candidate.action_type == failure.action_type && candidate.outcome == Outcome::Success;
            let same_file_fixed = failure.file_path.is_some()
                && candidate.file_path == failure.file_path
                && candidate.outcome == Outcome::Success;

            if same_type_fixed || same_file_fixed {
                fix = Some(candidate);
                break;
            }

            if candidate.outcome == Outcome::Failure && candidate.action_type == failure.action_type {
                // Unresolved: an intervening failure of the same type aborts the search.
                break;
            }
        }

        let Some(_fix) = fix else { continue };

        let mut sorted_files = edited_files.clone();
        sorted_files.sort();
        sorted_files.dedup();
        let key = (failure.action_type, sorted_files.clone());
        if seen_keys.contains(&key) {
            continue;
        }
        seen_keys.push(key);

        let category = match failure.action_type {
            ActionType::Test | ActionType::Build => "gotcha",
            _ => "pattern",
        };

        let files_text = if sorted_files.is_empty() {
            "no files recorded".to_string()
        } else {
            sorted_files.join(", ")
        };
        let error_snippet = failure
            .error_message
            .as_deref()
            .unwrap_or("")
            .chars()
            .take(ERROR_SNIPPET_MAX)
            .collect::<String>();

        let text = format!("Fixed by editing {files_text}. Original error: {error_snippet}");

        learnings.push(Learning::new(
            session_id,
            project_path,
            failure.timestamp.clone(),
            category,
            text,
            failure.error_message.clone(),
        ));
    }

    learnings
}
