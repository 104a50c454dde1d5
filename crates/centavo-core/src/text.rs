//! Case- and accent-insensitive text canonicalization
//!
//! Category and subcategory names arrive from two unrelated sources (the
//! remote taxonomy tables and LLM output), so equality checks go through a
//! single canonical form instead of comparing raw strings.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalize a string for matching.
///
/// Trims, NFD-decomposes accented characters, strips the combining marks,
/// lowercases without locale rules, and collapses internal whitespace runs
/// to a single space. Idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Keep only ASCII digits. Used to compare phone numbers that may carry
/// country prefixes, spaces or punctuation.
pub fn digits_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}
