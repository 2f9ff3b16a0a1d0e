use super::{log_storage_error, Action, ActionType, Outcome, Store};
use sqlx::Row;

impl Store {
    pub async fn insert_action(&self, action: &Action) -> bool {
        let result = sqlx::query(
            "INSERT INTO actions (session_id, timestamp, tool_name, file_path, action_type, description, outcome, error_message)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&action.session_id)
        .bind(&action.timestamp)
        .bind(&action.tool_name)
        .bind(&action.file_path)
        .bind(action.action_type.as_str())
        .bind(&action.description)
        .bind(action.outcome.as_str())
        .bind(&action.error_message)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => true,
            Err(err) => log_storage_error("insert_action", err, false),
        }
    }

    /// Ordered by timestamp ascending (spec §4.1).
    pub async fn session_actions(&self, session_id: &str) -> Vec<Action> {
        let rows = sqlx::query(
            "SELECT session_id, timestamp, tool_name, file_path, action_type, description, outcome, error_message
             FROM actions WHERE session_id = ? ORDER BY timestamp ASC, id ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await;

        match rows {
            Ok(rows) => rows
                .into_iter()
                .map(|row| Action {
                    session_id: row.get("session_id"),
                    timestamp: row.get("timestamp"),
                    tool_name: row.get("tool_name"),
                    file_path: row.get("file_path"),
                    action_type: ActionType::parse(&row.get::<String, _>("action_type")),
                    description: row.get("description"),
                    outcome: Outcome::parse(&row.get::<String, _>("outcome")),
                    error_message: row.get("error_message"),
                })
                .collect(),
            Err(err) => log_storage_error("session_actions", err, Vec::new()),
        }
    }
}
