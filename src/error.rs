//! Engine-wide error taxonomy.
//!
//! Every variant maps to a fixed logging level and caller-facing behavior
//! (see spec §7). Only the two variants below are ever actually constructed
//! in this engine: the other policies spec §7 describes (collaborator
//! unavailable, validation error, user error) are each handled inline at
//! their call site instead of flowing through this type —
//! `InjectionConfig::validate` and friends warn and substitute a default
//! directly, the Store's `log_storage_error` logs and returns a neutral
//! value directly, and the router's operator-facing messages (`query`,
//! `backup`) are plain `String`s returned straight to the caller. A
//! taxonomy variant with no constructor is dead code, so it isn't declared
//! here; `config::from_json` is the only place this engine ever constructs
//! an `EngineError`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Database could not be opened or a statement failed. Logged at `error`,
    /// caller receives a neutral/empty value.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Malformed JSON on stdin, in a stored snapshot array, or in the config
    /// file. Logged at `warn`, treated as empty/default.
    #[error("parse error: {0}")]
    ParseError(String),
}

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        EngineError::StoreUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::ParseError(err.to_string())
    }
}
