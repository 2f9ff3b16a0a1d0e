use super::{log_storage_error, Learning, Store};
use sqlx::Row;

impl Store {
    pub async fn insert_learning(&self, learning: &Learning) -> i64 {
        let result = sqlx::query(
            "INSERT INTO learnings (session_id, project_path, timestamp, category, learning, context, relevance_score, times_referenced)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&learning.session_id)
        .bind(&learning.project_path)
        .bind(&learning.timestamp)
        .bind(&learning.category)
        .bind(&learning.learning)
        .bind(&learning.context)
        .bind(learning.relevance_score.clamp(0.0, 1.0))
        .bind(learning.times_referenced)
        .execute(&self.pool)
        .await;

        match result {
            Ok(res) => res.last_insert_rowid(),
            Err(err) => log_storage_error("insert_learning", err, 0),
        }
    }

    /// Ordered by `relevance_score` descending (spec §4.1, §4.3).
    pub async fn top_learnings(&self, project_path: &str, limit: u32) -> Vec<Learning> {
        let rows = sqlx::query(
            "SELECT id, session_id, project_path, timestamp, category, learning, context, relevance_score, times_referenced
             FROM learnings WHERE project_path = ?
             ORDER BY relevance_score DESC LIMIT ?",
        )
        .bind(project_path)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await;

        match rows {
            Ok(rows) => rows.into_iter().map(learning_from_row).collect(),
            Err(err) => log_storage_error("top_learnings", err, Vec::new()),
        }
    }

    /// Increments `times_referenced` only; `relevance_score` is untouched
    /// (Open Question 1, resolution (a) — see SPEC_FULL.md §9).
    pub async fn increment_learning_reference(&self, id: i64) -> bool {
        let result = sqlx::query("UPDATE learnings SET times_referenced = times_referenced + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => true,
            Err(err) => log_storage_error("increment_learning_reference", err, false),
        }
    }

    /// Multiplies every `relevance_score` by `(1 - rate)` (spec §4.3 flat
    /// decay, not the teacher's stepped age-based retention).
    pub async fn decay_learnings(&self, rate: f64) -> u64 {
        let result = sqlx::query("UPDATE learnings SET relevance_score = relevance_score * ?")
            .bind(1.0 - rate)
            .execute(&self.pool)
            .await;

        match result {
            Ok(res) => res.rows_affected(),
            Err(err) => log_storage_error("decay_learnings", err, 0),
        }
    }

    /// Deletes rows with `relevance_score` strictly below `threshold`.
    /// Callers must decay before collecting within the same logical
    /// operation (spec §4.3 ordering requirement).
    pub async fn garbage_collect_learnings(&self, threshold: f64) -> u64 {
        let result = sqlx::query("DELETE FROM learnings WHERE relevance_score < ?")
            .bind(threshold)
            .execute(&self.pool)
            .await;

        match result {
            Ok(res) => res.rows_affected(),
            Err(err) => log_storage_error("garbage_collect_learnings", err, 0),
        }
    }
}

fn learning_from_row(row: sqlx::sqlite::SqliteRow) -> Learning {
    Learning {
        id: row.get("id"),
        session_id: row.get("session_id"),
        project_path: row.get("project_path"),
        timestamp: row.get("timestamp"),
        category: row.get("category"),
        learning: row.get("learning"),
        context: row.get("context"),
        relevance_score: row.get("relevance_score"),
        times_referenced: row.get("times_referenced"),
    }
}
