use super::{json_array, log_storage_error, parse_json_array, Decision, Store};
use sqlx::Row;

impl Store {
    pub async fn insert_decision(&self, decision: &Decision) -> i64 {
        let result = sqlx::query(
            "INSERT INTO decisions (session_id, project_path, timestamp, category, decision, rationale, files_affected, supersedes_id)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&decision.session_id)
        .bind(&decision.project_path)
        .bind(&decision.timestamp)
        .bind(&decision.category)
        .bind(&decision.decision)
        .bind(&decision.rationale)
        .bind(json_array(&decision.files_affected))
        .bind(decision.supersedes_id)
        .execute(&self.pool)
        .await;

        match result {
            Ok(res) => res.last_insert_rowid(),
            Err(err) => log_storage_error("insert_decision", err, 0),
        }
    }

    /// Excludes any decision referenced by another row's `supersedes_id`
    /// (I2: a decision is active iff nothing references it).
    pub async fn active_decisions(&self, project_path: &str, limit: u32) -> Vec<Decision> {
        let rows = sqlx::query(
            "SELECT id, session_id, project_path, timestamp, category, decision, rationale, files_affected, supersedes_id
             FROM decisions d
             WHERE d.project_path = ?
               AND NOT EXISTS (SELECT 1 FROM decisions s WHERE s.supersedes_id = d.id)
             ORDER BY d.timestamp DESC
             LIMIT ?",
        )
        .bind(project_path)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await;

        match rows {
            Ok(rows) => rows.into_iter().map(decision_from_row).collect(),
            Err(err) => log_storage_error("active_decisions", err, Vec::new()),
        }
    }

    /// Inserts `new_decision` with `supersedes_id` set to `old_id`, making
    /// exactly the new row active among the (old, new) pair.
    pub async fn supersede_decision(&self, old_id: i64, mut new_decision: Decision) -> i64 {
        new_decision.supersedes_id = Some(old_id);
        self.insert_decision(&new_decision).await
    }
}

fn decision_from_row(row: sqlx::sqlite::SqliteRow) -> Decision {
    Decision {
        id: row.get("id"),
        session_id: row.get("session_id"),
        project_path: row.get("project_path"),
        timestamp: row.get("timestamp"),
        category: row.get("category"),
        decision: row.get("decision"),
        rationale: row.get("rationale"),
        files_affected: parse_json_array(&row.get::<String, _>("files_affected")),
        supersedes_id: row.get("supersedes_id"),
    }
}
