//! Frozen stop-word list for prompt-similarity FTS query construction
//! (spec §9 Design Notes: must be stable because the "repeated instruction"
//! advisory is user-observable).

pub const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "that", "this", "with", "from", "have", "has", "had",
    "you", "your", "are", "was", "were", "been", "being", "will", "would",
    "could", "should", "can", "not", "but", "all", "any", "some", "into",
    "onto", "what", "when", "where", "which", "while", "about", "after",
    "before", "then", "than", "them", "they", "there", "their", "these",
    "those", "here", "please", "make", "need", "want", "like", "just",
];

pub const MAX_QUERY_TERMS: usize = 10;
pub const MIN_TERM_LEN: usize = 4;

/// Builds an OR-joined FTS5 query from words longer than three characters
/// with stop words removed, capped at [`MAX_QUERY_TERMS`] terms.
pub fn build_query(text: &str) -> String {
    let terms: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .map(|word| word.to_ascii_lowercase())
        .filter(|word| word.len() >= MIN_TERM_LEN && !STOP_WORDS.contains(&word.as_str()))
        .take(MAX_QUERY_TERMS)
        .collect();

    terms.join(" OR ")
}
