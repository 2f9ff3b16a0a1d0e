use super::{json_array, log_storage_error, parse_json_array, Snapshot, SnapshotTrigger, Store};
use sqlx::Row;

impl Store {
    pub async fn insert_snapshot(&self, snapshot: &Snapshot) -> i64 {
        let result = sqlx::query(
            "INSERT INTO snapshots (session_id, timestamp, trigger, current_task, progress_summary, open_questions, next_steps, working_files)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&snapshot.session_id)
        .bind(&snapshot.timestamp)
        .bind(snapshot.trigger.as_str())
        .bind(&snapshot.current_task)
        .bind(&snapshot.progress_summary)
        .bind(json_array(&snapshot.open_questions))
        .bind(json_array(&snapshot.next_steps))
        .bind(json_array(&snapshot.working_files))
        .execute(&self.pool)
        .await;

        match result {
            Ok(res) => res.last_insert_rowid(),
            Err(err) => log_storage_error("insert_snapshot", err, 0),
        }
    }

    /// Inserts a pre-compact snapshot and increments the session's
    /// `compaction_count` in one transaction (spec §5: concurrent
    /// `PreCompact` invocations for the same session must not lose an
    /// increment). The counter is bumped in-place by the `UPDATE` itself
    /// rather than read back into the caller and rewritten, so there is no
    /// read-modify-write window for two overlapping calls to race on.
    pub async fn record_precompact_snapshot(&self, snapshot: &Snapshot) -> i64 {
        let mut tx = match self.pool.begin().await {
            Ok(tx) => tx,
            Err(err) => return log_storage_error("record_precompact_snapshot", err, 0),
        };

        let insert_result = sqlx::query(
            "INSERT INTO snapshots (session_id, timestamp, trigger, current_task, progress_summary, open_questions, next_steps, working_files)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&snapshot.session_id)
        .bind(&snapshot.timestamp)
        .bind(snapshot.trigger.as_str())
        .bind(&snapshot.current_task)
        .bind(&snapshot.progress_summary)
        .bind(json_array(&snapshot.open_questions))
        .bind(json_array(&snapshot.next_steps))
        .bind(json_array(&snapshot.working_files))
        .execute(&mut *tx)
        .await;

        let snapshot_id = match insert_result {
            Ok(res) => res.last_insert_rowid(),
            Err(err) => {
                let _ = tx.rollback().await;
                return log_storage_error("record_precompact_snapshot", err, 0);
            }
        };

        let update_result = sqlx::query("UPDATE sessions SET compaction_count = compaction_count + 1 WHERE id = ?")
            .bind(&snapshot.session_id)
            .execute(&mut *tx)
            .await;

        if let Err(err) = update_result {
            let _ = tx.rollback().await;
            return log_storage_error("record_precompact_snapshot", err, 0);
        }

        match tx.commit().await {
            Ok(_) => snapshot_id,
            Err(err) => log_storage_error("record_precompact_snapshot", err, 0),
        }
    }

    pub async fn latest_snapshot(&self, session_id: &str) -> Option<Snapshot> {
        let row = sqlx::query(
            "SELECT id, session_id, timestamp, trigger, current_task, progress_summary, open_questions, next_steps, working_files
             FROM snapshots WHERE session_id = ? ORDER BY timestamp DESC, id DESC LIMIT 1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await;

        match row {
            Ok(row) => row.map(snapshot_from_row),
            Err(err) => log_storage_error("latest_snapshot", err, None),
        }
    }

    /// Most recent snapshot for any session under `project_path`, optionally
    /// excluding the current session (spec §4.1/§4.4 cross-session recovery).
    pub async fn latest_project_snapshot(
        &self,
        project_path: &str,
        exclude_session: Option<&str>,
    ) -> Option<Snapshot> {
        let row = sqlx::query(
            "SELECT sn.id, sn.session_id, sn.timestamp, sn.trigger, sn.current_task, sn.progress_summary, sn.open_questions, sn.next_steps, sn.working_files
             FROM snapshots sn
             JOIN sessions se ON se.id = sn.session_id
             WHERE se.project_path = ? AND (? IS NULL OR sn.session_id != ?)
             ORDER BY sn.timestamp DESC, sn.id DESC LIMIT 1",
        )
        .bind(project_path)
        .bind(exclude_session)
        .bind(exclude_session)
        .fetch_optional(&self.pool)
        .await;

        match row {
            Ok(row) => row.map(snapshot_from_row),
            Err(err) => log_storage_error("latest_project_snapshot", err, None),
        }
    }
}

fn snapshot_from_row(row: sqlx::sqlite::SqliteRow) -> Snapshot {
    Snapshot {
        id: row.get("id"),
        session_id: row.get("session_id"),
        timestamp: row.get("timestamp"),
        trigger: SnapshotTrigger::parse(&row.get::<String, _>("trigger")),
        current_task: row.get("current_task"),
        progress_summary: row.get("progress_summary"),
        open_questions: parse_json_array(&row.get::<String, _>("open_questions")),
        next_steps: parse_json_array(&row.get::<String, _>("next_steps")),
        working_files: parse_json_array(&row.get::<String, _>("working_files")),
    }
}
