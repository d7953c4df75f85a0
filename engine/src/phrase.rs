//! Lexical phrase comparison.
//!
//! Intentionally lenient: lowercase whitespace-delimited word sets
//! (duplicates ignored), order-independent, matching when at least
//! half of the enrolled words reappear in the transcript. ASR noise
//! routinely swaps articles and fillers; a strict string compare would
//! reject almost every honest attempt.

use std::collections::HashSet;

/// Minimum fraction of enrolled words that must reappear.
pub const PHRASE_OVERLAP_THRESHOLD: f64 = 0.5;

fn word_set(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect()
}

/// Fraction of the enrolled phrase's words present in the transcript,
/// or `None` when no phrase was enrolled.
pub fn overlap_ratio(expected: &str, transcript: &str) -> Option<f64> {
    let expected_words = word_set(expected);
    if expected_words.is_empty() {
        return None;
    }
    let transcript_words = word_set(transcript);
    let common = expected_words.intersection(&transcript_words).count();
    Some(common as f64 / expected_words.len() as f64)
}

/// Whether the spoken transcript satisfies the enrolled phrase.
/// Vacuously true when nothing was enrolled.
pub fn phrase_match(expected: &str, transcript: &str) -> bool {
    match overlap_ratio(expected, transcript) {
        None => true,
        Some(ratio) => ratio >= PHRASE_OVERLAP_THRESHOLD,
    }
}
