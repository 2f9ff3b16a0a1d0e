use super::{log_storage_error, SearchCategory, SearchHit, Store};
use sqlx::Row;

const SNIPPET_TOKENS: i64 = 32;
const HIGHLIGHT_OPEN: &str = "**";
const HIGHLIGHT_CLOSE: &str = "**";

impl Store {
    /// Full-text search across sessions, decisions, and learnings
    /// (spec §4.1, §4.8 `search` tool operation). Hits are merged and sorted
    /// ascending by FTS5 `rank` (more negative = more relevant) and
    /// truncated to `limit`.
    pub async fn search_memory(&self, query: &str, category: SearchCategory, limit: u32) -> Vec<SearchHit> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let mut hits = Vec::new();

        if matches!(category, SearchCategory::Sessions | SearchCategory::All) {
            hits.extend(self.search_sessions_fts(query).await);
        }
        if matches!(category, SearchCategory::Decisions | SearchCategory::All) {
            hits.extend(self.search_decisions_fts(query).await);
        }
        if matches!(category, SearchCategory::Learnings | SearchCategory::All) {
            hits.extend(self.search_learnings_fts(query).await);
        }

        hits.sort_by(|a, b| a.rank.partial_cmp(&b.rank).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(limit as usize);
        hits
    }

    async fn search_sessions_fts(&self, query: &str) -> Vec<SearchHit> {
        let rows = sqlx::query(
            "SELECT s.rowid AS row_id, snippet(sessions_fts, 0, ?, ?, '...', ?) AS snippet, sessions_fts.rank AS rank
             FROM sessions_fts
             JOIN sessions s ON s.rowid = sessions_fts.rowid
             WHERE sessions_fts MATCH ?
             ORDER BY sessions_fts.rank",
        )
        .bind(HIGHLIGHT_OPEN)
        .bind(HIGHLIGHT_CLOSE)
        .bind(SNIPPET_TOKENS)
        .bind(query)
        .fetch_all(&self.pool)
        .await;

        match rows {
            Ok(rows) => rows
                .into_iter()
                .map(|row| SearchHit {
                    source: "session",
                    row_id: row.get("row_id"),
                    snippet: row.get("snippet"),
                    rank: row.get("rank"),
                })
                .collect(),
            Err(err) => log_storage_error("search_sessions_fts", err, Vec::new()),
        }
    }

    async fn search_decisions_fts(&self, query: &str) -> Vec<SearchHit> {
        let rows = sqlx::query(
            "SELECT d.id AS row_id, snippet(decisions_fts, 0, ?, ?, '...', ?) AS snippet, decisions_fts.rank AS rank
             FROM decisions_fts
             JOIN decisions d ON d.id = decisions_fts.rowid
             WHERE decisions_fts MATCH ?
             ORDER BY decisions_fts.rank",
        )
        .bind(HIGHLIGHT_OPEN)
        .bind(HIGHLIGHT_CLOSE)
        .bind(SNIPPET_TOKENS)
        .bind(query)
        .fetch_all(&self.pool)
        .await;

        match rows {
            Ok(rows) => rows
                .into_iter()
                .map(|row| SearchHit {
                    source: "decision",
                    row_id: row.get("row_id"),
                    snippet: row.get("snippet"),
                    rank: row.get("rank"),
                })
                .collect(),
            Err(err) => log_storage_error("search_decisions_fts", err, Vec::new()),
        }
    }

    async fn search_learnings_fts(&self, query: &str) -> Vec<SearchHit> {
        let rows = sqlx::query(
            "SELECT l.id AS row_id, snippet(learnings_fts, 0, ?, ?, '...', ?) AS snippet, learnings_fts.rank AS rank
             FROM learnings_fts
             JOIN learnings l ON l.id = learnings_fts.rowid
             WHERE learnings_fts MATCH ?
             ORDER BY learnings_fts.rank",
        )
        .bind(HIGHLIGHT_OPEN)
        .bind(HIGHLIGHT_CLOSE)
        .bind(SNIPPET_TOKENS)
        .bind(query)
        .fetch_all(&self.pool)
        .await;

        match rows {
            Ok(rows) => rows
                .into_iter()
                .map(|row| SearchHit {
                    source: "learning",
                    row_id: row.get("row_id"),
                    snippet: row.get("snippet"),
                    rank: row.get("rank"),
                })
                .collect(),
            Err(err) => log_storage_error("search_learnings_fts", err, Vec::new()),
        }
    }
}
