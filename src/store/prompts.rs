use super::{log_storage_error, Prompt, Store};
use sqlx::Row;

/// A prompt-similarity hit paired with its FTS5 rank (ascending — more
/// negative means more relevant).
#[derive(Debug, Clone)]
pub struct PromptMatch {
    pub prompt: Prompt,
    pub rank: f64,
}

impl Store {
    pub async fn insert_prompt(&self, prompt: &Prompt) -> i64 {
        let result = sqlx::query(
            "INSERT INTO prompts (session_id, project_path, timestamp, prompt) VALUES (?, ?, ?, ?)",
        )
        .bind(&prompt.session_id)
        .bind(&prompt.project_path)
        .bind(&prompt.timestamp)
        .bind(&prompt.prompt)
        .execute(&self.pool)
        .await;

        match result {
            Ok(res) => res.last_insert_rowid(),
            Err(err) => log_storage_error("insert_prompt", err, 0),
        }
    }

    /// FTS5 similarity search over past prompts in the same project. `rank`
    /// is ascending — more negative means more relevant (spec §4.1, §4.6).
    pub async fn find_similar_prompts(
        &self,
        query: &str,
        project_path: &str,
        exclude_session: Option<&str>,
        limit: u32,
    ) -> Vec<PromptMatch> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let rows = sqlx::query(
            "SELECT p.id, p.session_id, p.project_path, p.timestamp, p.prompt, f.rank AS rank
             FROM prompts_fts f
             JOIN prompts p ON p.id = f.rowid
             WHERE f.prompts_fts MATCH ?
               AND p.project_path = ?
               AND (? IS NULL OR p.session_id != ?)
             ORDER BY f.rank
             LIMIT ?",
        )
        .bind(query)
        .bind(project_path)
        .bind(exclude_session)
        .bind(exclude_session)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await;

        match rows {
            Ok(rows) => rows
                .into_iter()
                .map(|row| PromptMatch {
                    prompt: Prompt {
                        id: row.get("id"),
                        session_id: row.get("session_id"),
                        project_path: row.get("project_path"),
                        timestamp: row.get("timestamp"),
                        prompt: row.get("prompt"),
                    },
                    rank: row.get("rank"),
                })
                .collect(),
            // Malformed FTS5 MATCH syntax (e.g. bare punctuation) is a query
            // error, not a storage outage — still degrade to empty per the
            // store's never-propagate contract.
            Err(err) => log_storage_error("find_similar_prompts", err, Vec::new()),
        }
    }
}
