use super::{log_storage_error, Metric, ProjectMetrics, Store};
use sqlx::Row;

impl Store {
    pub async fn insert_metric(&self, metric: &Metric) -> bool {
        let result = sqlx::query(
            "INSERT INTO metrics (session_id, timestamp, metric_name, metric_value) VALUES (?, ?, ?, ?)",
        )
        .bind(&metric.session_id)
        .bind(&metric.timestamp)
        .bind(&metric.metric_name)
        .bind(metric.metric_value)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => true,
            Err(err) => log_storage_error("insert_metric", err, false),
        }
    }

    pub async fn session_metrics(&self, session_id: &str) -> Vec<Metric> {
        let rows = sqlx::query(
            "SELECT session_id, timestamp, metric_name, metric_value FROM metrics
             WHERE session_id = ? ORDER BY timestamp ASC, id ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await;

        match rows {
            Ok(rows) => rows
                .into_iter()
                .map(|row| Metric {
                    session_id: row.get("session_id"),
                    timestamp: row.get("timestamp"),
                    metric_name: row.get("metric_name"),
                    metric_value: row.get("metric_value"),
                })
                .collect(),
            Err(err) => log_storage_error("session_metrics", err, Vec::new()),
        }
    }

    /// Aggregate project-level bundle (spec §4.8 `metrics` tool operation).
    pub async fn project_metrics(&self, project_path: &str) -> ProjectMetrics {
        let row = sqlx::query(
            "SELECT
                (SELECT COUNT(*) FROM sessions WHERE project_path = ?) AS session_count,
                (SELECT COUNT(*) FROM actions a JOIN sessions se ON se.id = a.session_id WHERE se.project_path = ?) AS total_actions,
                (SELECT COUNT(*) FROM actions a JOIN sessions se ON se.id = a.session_id WHERE se.project_path = ? AND a.outcome = 'failure') AS total_failures,
                (SELECT COALESCE(AVG(context_utilization_peak), 0.0) FROM sessions WHERE project_path = ? AND context_utilization_peak IS NOT NULL) AS avg_peak_utilization,
                (SELECT COALESCE(SUM(compaction_count), 0) FROM sessions WHERE project_path = ?) AS total_compactions,
                (SELECT COUNT(*) FROM decisions WHERE project_path = ?) AS decision_count,
                (SELECT COUNT(*) FROM learnings WHERE project_path = ?) AS learning_count,
                (SELECT COUNT(*) FROM prompts WHERE project_path = ?) AS prompt_count",
        )
        .bind(project_path)
        .bind(project_path)
        .bind(project_path)
        .bind(project_path)
        .bind(project_path)
        .bind(project_path)
        .bind(project_path)
        .bind(project_path)
        .fetch_one(&self.pool)
        .await;

        match row {
            Ok(row) => ProjectMetrics {
                session_count: row.get("session_count"),
                total_actions: row.get("total_actions"),
                total_failures: row.get("total_failures"),
                avg_peak_utilization: row.get("avg_peak_utilization"),
                total_compactions: row.get("total_compactions"),
                decision_count: row.get("decision_count"),
                learning_count: row.get("learning_count"),
                prompt_count: row.get("prompt_count"),
            },
            Err(err) => log_storage_error("project_metrics", err, ProjectMetrics::default()),
        }
    }
}
