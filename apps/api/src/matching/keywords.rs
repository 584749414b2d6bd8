//! Keyword extraction: frequency-ranked content words from free text.
//!
//! Shared by the ATS scorer and resume tailoring. Pure and deterministic.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum number of keywords returned by [`extract_keywords`].
pub const MAX_KEYWORDS: usize = 20;

/// Common English function words that carry no signal for keyword overlap.
pub const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "a", "an", "is",
    "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "may", "might", "must", "can", "this", "that", "these", "those",
];

/// Whole words of three or more ASCII letters. Applied to lowercased text.
static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-z]{3,}\b").expect("keyword pattern is valid"));

#[inline]
fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Extracts up to [`MAX_KEYWORDS`] keywords from `text`.
///
/// Tokens are lowercased whole words of at least three ASCII letters with stop
/// words removed. Ordered by descending occurrence count; ties keep the order
/// in which the token was first seen.
///
/// Empty or all-stop-word input yields an empty vector.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();

    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for token in WORD_RE.find_iter(&lowered).map(|m| m.as_str()) {
        if is_stop_word(token) {
            continue;
        }
        match index.get(token) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(token, counts.len());
                counts.push((token, 1));
            }
        }
    }

    // Vec::sort_by is stable, so equal counts stay in first-seen order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(token, _)| token.to_string())
        .collect()
}
