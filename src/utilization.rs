//! Context-window utilization estimate (spec §4.6). File-size based, no
//! tokenizer — must stay consistent with the byte-per-token heuristic in
//! [`crate::tokens`].

use std::path::Path;

const CONTEXT_WINDOW_TOKENS: u64 = 200_000;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Utilization {
    pub bytes: u64,
    pub estimated_tokens: u64,
    pub utilization: f64,
}

/// Reads only the file's size. A missing file yields all zeros; this never
/// raises (P12).
pub fn estimate_utilization(path: &Path) -> Utilization {
    let bytes = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(_) => return Utilization::default(),
    };

    let estimated_tokens = bytes / crate::tokens::BYTES_PER_TOKEN as u64;
    let utilization = estimated_tokens as f64 / CONTEXT_WINDOW_TOKENS as f64;

    Utilization { bytes, estimated_tokens, utilization }
}
