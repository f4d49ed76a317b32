//! Rough token estimation for generated prompts.

/// Multiplier for token estimation from word count.
const TOKEN_ESTIMATE_MULTIPLIER: f64 = 1.3;

/// Rough token estimate based on word count.
///
/// Uses the heuristic: tokens ~= words * 1.3.
pub fn estimate_token_count(text: &str) -> usize {
    let word_count = text.split_whitespace().count();
    (word_count as f64 * TOKEN_ESTIMATE_MULTIPLIER).ceil() as usize
}

/// Number of whitespace-separated words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
