use super::{log_storage_error, json_array, parse_json_array, Session, SessionPartial, Store};
use sqlx::Row;

impl Store {
    pub async fn create_session(
        &self,
        id: &str,
        project_path: &str,
        parent_session_id: Option<&str>,
    ) -> Option<Session> {
        let started_at = chrono::Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO sessions (id, project_path, started_at, files_modified, compaction_count, parent_session_id)
             VALUES (?, ?, ?, '[]', 0, ?)
             ON CONFLICT(id) DO NOTHING",
        )
        .bind(id)
        .bind(project_path)
        .bind(&started_at)
        .bind(parent_session_id)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => self.get_session(id).await,
            Err(err) => log_storage_error("create_session", err, None),
        }
    }

    pub async fn get_session(&self, id: &str) -> Option<Session> {
        let row = sqlx::query(
            "SELECT id, project_path, started_at, ended_at, summary, task_description,
                    files_modified, compaction_count, context_utilization_peak, parent_session_id
             FROM sessions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        match row {
            Ok(Some(row)) => Some(Session {
                id: row.get("id"),
                project_path: row.get("project_path"),
                started_at: row.get("started_at"),
                ended_at: row.get("ended_at"),
                summary: row.get("summary"),
                task_description: row.get("task_description"),
                files_modified: parse_json_array(&row.get::<String, _>("files_modified")),
                compaction_count: row.get("compaction_count"),
                context_utilization_peak: row.get("context_utilization_peak"),
                parent_session_id: row.get("parent_session_id"),
            }),
            Ok(None) => None,
            Err(err) => log_storage_error("get_session", err, None),
        }
    }

    /// Allow-list driven partial update (spec §9 Design Notes): only the
    /// fields present in `partial` are touched, via an explicit column
    /// enumeration rather than reflection.
    pub async fn update_session(&self, id: &str, partial: SessionPartial) -> bool {
        let mut clauses: Vec<&str> = Vec::new();
        let mut files_modified_json = None;
        if partial.ended_at.is_some() {
            clauses.push("ended_at = ?");
        }
        if partial.summary.is_some() {
            clauses.push("summary = ?");
        }
        if partial.task_description.is_some() {
            clauses.push("task_description = ?");
        }
        if let Some(files) = &partial.files_modified {
            files_modified_json = Some(json_array(files));
            clauses.push("files_modified = ?");
        }
        if partial.compaction_count.is_some() {
            clauses.push("compaction_count = ?");
        }
        if partial.context_utilization_peak.is_some() {
            clauses.push("context_utilization_peak = ?");
        }

        if clauses.is_empty() {
            return true;
        }

        let sql = format!("UPDATE sessions SET {} WHERE id = ?", clauses.join(", "));
        let mut query = sqlx::query(&sql);
        if let Some(v) = &partial.ended_at {
            query = query.bind(v);
        }
        if let Some(v) = &partial.summary {
            query = query.bind(v);
        }
        if let Some(v) = &partial.task_description {
            query = query.bind(v);
        }
        if let Some(v) = &files_modified_json {
            query = query.bind(v);
        }
        if let Some(v) = partial.compaction_count {
            query = query.bind(v);
        }
        if let Some(v) = partial.context_utilization_peak {
            query = query.bind(v);
        }
        query = query.bind(id);

        match query.execute(&self.pool).await {
            Ok(_) => true,
            Err(err) => log_storage_error("update_session", err, false),
        }
    }

    pub async fn recent_sessions(&self, project_path: &str, limit: u32) -> Vec<Session> {
        self.sessions_query(project_path, limit, false).await
    }

    /// Only sessions with a non-empty summary (spec §4.1).
    pub async fn recent_summarized_sessions(&self, project_path: &str, limit: u32) -> Vec<Session> {
        self.sessions_query(project_path, limit, true).await
    }

    async fn sessions_query(&self, project_path: &str, limit: u32, summarized_only: bool) -> Vec<Session> {
        let sql = if summarized_only {
            "SELECT id, project_path, started_at, ended_at, summary, task_description,
                    files_modified, compaction_count, context_utilization_peak, parent_session_id
             FROM sessions
             WHERE project_path = ? AND summary IS NOT NULL AND summary != ''
             ORDER BY started_at DESC LIMIT ?"
        } else {
            "SELECT id, project_path, started_at, ended_at, summary, task_description,
                    files_modified, compaction_count, context_utilization_peak, parent_session_id
             FROM sessions
             WHERE project_path = ?
             ORDER BY started_at DESC LIMIT ?"
        };

        let rows = sqlx::query(sql)
            .bind(project_path)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await;

        match rows {
            Ok(rows) => rows
                .into_iter()
                .map(|row| Session {
                    id: row.get("id"),
                    project_path: row.get("project_path"),
                    started_at: row.get("started_at"),
                    ended_at: row.get("ended_at"),
                    summary: row.get("summary"),
                    task_description: row.get("task_description"),
                    files_modified: parse_json_array(&row.get::<String, _>("files_modified")),
                    compaction_count: row.get("compaction_count"),
                    context_utilization_peak: row.get("context_utilization_peak"),
                    parent_session_id: row.get("parent_session_id"),
                })
                .collect(),
            Err(err) => log_storage_error("recent_sessions", err, Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::Store;
    use super::*;

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = Store::open_in_memory().await.unwrap();
        store.create_session("s1", "/proj", None).await;
        let session = store.get_session("s1").await.unwrap();
        assert_eq!(session.project_path, "/proj");
        assert_eq!(session.compaction_count, 0);
    }

    #[tokio::test]
    async fn update_session_only_touches_given_fields() {
        let store = Store::open_in_memory().await.unwrap();
        store.create_session("s1", "/proj", None).await;
        store
            .update_session(
                "s1",
                SessionPartial { summary: Some("did things".into()), ..Default::default() },
            )
            .await;
        let session = store.get_session("s1").await.unwrap();
        assert_eq!(session.summary.as_deref(), Some("did things"));
        assert!(session.ended_at.is_none());
    }

    #[tokio::test]
    async fn recent_summarized_sessions_excludes_empty_summary() {
        let store = Store::open_in_memory().await.unwrap();
        store.create_session("s1", "/proj", None).await;
        store.create_session("s2", "/proj", None).await;
        store
            .update_session("s2", SessionPartial { summary: Some("done".into()), ..Default::default() })
            .await;

        let summarized = store.recent_summarized_sessions("/proj", 10).await;
        assert_eq!(summarized.len(), 1);
        assert_eq!(summarized[0].id, "s2");
    }

    #[tokio::test]
    async fn missing_session_returns_none() {
        let store = Store::open_in_memory().await.unwrap();
        assert!(store.get_session("nope").await.is_none());
    }
}
