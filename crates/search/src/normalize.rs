//! Text normalization.
//!
//! Turns raw user text into an ordered sequence of lowercase word tokens.

use once_cell::sync::Lazy;
use regex::Regex;

/// Anything that is neither a word character nor whitespace.
static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s]").expect("punctuation pattern is valid"));

/// Normalize text into word tokens.
///
/// Line breaks become spaces, punctuation is stripped, the result is
/// lowercased and split on whitespace. Blank input yields no tokens.
///
/// # Arguments
/// * `text` - Raw input text
///
/// # Returns
/// Tokens in input order
pub fn normalize(text: &str) -> Vec<String> {
    let flattened = text.replace(['\n', '\r'], " ");
    let stripped = PUNCTUATION.replace_all(&flattened, "");

    stripped
        .to_lowercase()
        .split_whitespace()
        .map(String::from)
        .collect()
}
