//! Embedded schema, applied idempotently at first open (spec §4.1).
//!
//! FTS synchronization is enforced entirely by triggers on the base tables;
//! the code layer never re-implements it (spec §9 Design Notes). This is
//! the same external-content FTS5 + `_ai`/`_ad`/`_au` trigger shape used for
//! symbol search in the retrieval layer this pattern is grounded on, applied
//! here to all four mirrored tables (sessions, decisions, learnings,
//! prompts).

pub const SCHEMA_VERSION: i64 = 1;

pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS meta (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sessions (
    id                         TEXT PRIMARY KEY,
    project_path               TEXT NOT NULL,
    started_at                 TEXT NOT NULL,
    ended_at                   TEXT,
    summary                    TEXT,
    task_description           TEXT,
    files_modified              TEXT NOT NULL DEFAULT '[]',
    compaction_count            INTEGER NOT NULL DEFAULT 0,
    context_utilization_peak     REAL,
    parent_session_id            TEXT REFERENCES sessions(id)
);
CREATE INDEX IF NOT EXISTS idx_sessions_project ON sessions(project_path);

CREATE TABLE IF NOT EXISTS actions (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id    TEXT NOT NULL REFERENCES sessions(id),
    timestamp     TEXT NOT NULL,
    tool_name     TEXT NOT NULL,
    file_path     TEXT,
    action_type   TEXT NOT NULL,
    description   TEXT NOT NULL,
    outcome       TEXT NOT NULL,
    error_message TEXT
);
CREATE INDEX IF NOT EXISTS idx_actions_session ON actions(session_id, timestamp);

CREATE TABLE IF NOT EXISTS decisions (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id     TEXT NOT NULL REFERENCES sessions(id),
    project_path   TEXT NOT NULL,
    timestamp      TEXT NOT NULL,
    category       TEXT NOT NULL,
    decision       TEXT NOT NULL,
    rationale      TEXT,
    files_affected TEXT NOT NULL DEFAULT '[]',
    supersedes_id  INTEGER REFERENCES decisions(id)
);
CREATE INDEX IF NOT EXISTS idx_decisions_project ON decisions(project_path);
CREATE INDEX IF NOT EXISTS idx_decisions_supersedes ON decisions(supersedes_id);

CREATE TABLE IF NOT EXISTS learnings (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id       TEXT NOT NULL REFERENCES sessions(id),
    project_path     TEXT NOT NULL,
    timestamp        TEXT NOT NULL,
    category         TEXT NOT NULL,
    learning         TEXT NOT NULL,
    context          TEXT,
    relevance_score  REAL NOT NULL DEFAULT 1.0,
    times_referenced INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_learnings_project ON learnings(project_path, relevance_score);

CREATE TABLE IF NOT EXISTS snapshots (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id       TEXT NOT NULL REFERENCES sessions(id),
    timestamp        TEXT NOT NULL,
    trigger          TEXT NOT NULL,
    current_task     TEXT,
    progress_summary TEXT,
    open_questions   TEXT NOT NULL DEFAULT '[]',
    next_steps       TEXT NOT NULL DEFAULT '[]',
    working_files    TEXT NOT NULL DEFAULT '[]'
);
CREATE INDEX IF NOT EXISTS idx_snapshots_session ON snapshots(session_id, timestamp);

CREATE TABLE IF NOT EXISTS metrics (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id   TEXT NOT NULL REFERENCES sessions(id),
    timestamp    TEXT NOT NULL,
    metric_name  TEXT NOT NULL,
    metric_value REAL NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_metrics_session ON metrics(session_id);

CREATE TABLE IF NOT EXISTS prompts (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id   TEXT NOT NULL REFERENCES sessions(id),
    project_path TEXT NOT NULL,
    timestamp    TEXT NOT NULL,
    prompt       TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_prompts_project ON prompts(project_path);

-- FTS mirrors: external-content tables synced by triggers (I4).

CREATE VIRTUAL TABLE IF NOT EXISTS sessions_fts USING fts5(
    summary,
    content=sessions,
    content_rowid=rowid
);

CREATE TRIGGER IF NOT EXISTS sessions_ai AFTER INSERT ON sessions BEGIN
    INSERT INTO sessions_fts(rowid, summary) VALUES (new.rowid, new.summary);
END;
CREATE TRIGGER IF NOT EXISTS sessions_ad AFTER DELETE ON sessions BEGIN
    INSERT INTO sessions_fts(sessions_fts, rowid, summary) VALUES ('delete', old.rowid, old.summary);
END;
CREATE TRIGGER IF NOT EXISTS sessions_au AFTER UPDATE ON sessions BEGIN
    INSERT INTO sessions_fts(sessions_fts, rowid, summary) VALUES ('delete', old.rowid, old.summary);
    INSERT INTO sessions_fts(rowid, summary) VALUES (new.rowid, new.summary);
END;

CREATE VIRTUAL TABLE IF NOT EXISTS decisions_fts USING fts5(
    decision,
    rationale,
    content=decisions,
    content_rowid=id
);

CREATE TRIGGER IF NOT EXISTS decisions_ai AFTER INSERT ON decisions BEGIN
    INSERT INTO decisions_fts(rowid, decision, rationale) VALUES (new.id, new.decision, new.rationale);
END;
CREATE TRIGGER IF NOT EXISTS decisions_ad AFTER DELETE ON decisions BEGIN
    INSERT INTO decisions_fts(decisions_fts, rowid, decision, rationale) VALUES ('delete', old.id, old.decision, old.rationale);
END;
CREATE TRIGGER IF NOT EXISTS decisions_au AFTER UPDATE ON decisions BEGIN
    INSERT INTO decisions_fts(decisions_fts, rowid, decision, rationale) VALUES ('delete', old.id, old.decision, old.rationale);
    INSERT INTO decisions_fts(rowid, decision, rationale) VALUES (new.id, new.decision, new.rationale);
END;

CREATE VIRTUAL TABLE IF NOT EXISTS learnings_fts USING fts5(
    learning,
    context,
    content=learnings,
    content_rowid=id
);

CREATE TRIGGER IF NOT EXISTS learnings_ai AFTER INSERT ON learnings BEGIN
    INSERT INTO learnings_fts(rowid, learning, context) VALUES (new.id, new.learning, new.context);
END;
CREATE TRIGGER IF NOT EXISTS learnings_ad AFTER DELETE ON learnings BEGIN
    INSERT INTO learnings_fts(learnings_fts, rowid, learning, context) VALUES ('delete', old.id, old.learning, old.context);
END;
CREATE TRIGGER IF NOT EXISTS learnings_au AFTER UPDATE ON learnings BEGIN
    INSERT INTO learnings_fts(learnings_fts, rowid, learning, context) VALUES ('delete', old.id, old.learning, old.context);
    INSERT INTO learnings_fts(rowid, learning, context) VALUES (new.id, new.learning, new.context);
END;

CREATE VIRTUAL TABLE IF NOT EXISTS prompts_fts USING fts5(
    prompt,
    content=prompts,
    content_rowid=id
);

CREATE TRIGGER IF NOT EXISTS prompts_ai AFTER INSERT ON prompts BEGIN
    INSERT INTO prompts_fts(rowid, prompt) VALUES (new.id, new.prompt);
END;
CREATE TRIGGER IF NOT EXISTS prompts_ad AFTER DELETE ON prompts BEGIN
    INSERT INTO prompts_fts(prompts_fts, rowid, prompt) VALUES ('delete', old.id, old.prompt);
END;
CREATE TRIGGER IF NOT EXISTS prompts_au AFTER UPDATE ON prompts BEGIN
    INSERT INTO prompts_fts(prompts_fts, rowid, prompt) VALUES ('delete', old.id, old.prompt);
    INSERT INTO prompts_fts(rowid, prompt) VALUES (new.id, new.prompt);
END;
"#;
