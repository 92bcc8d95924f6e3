//! Candidate phrase generation.
//!
//! Every contiguous run of up to `max_words` tokens is a candidate. The
//! result is a [`BTreeSet`], so duplicates collapse and iteration order is
//! lexicographic and reproducible.

use std::collections::BTreeSet;

/// Default upper bound on words per candidate phrase.
pub const DEFAULT_MAX_PHRASE_WORDS: usize = 5;

/// Generate the deduplicated set of word n-grams.
///
/// # Arguments
/// * `tokens` - Normalized tokens in input order
/// * `max_words` - Longest phrase to emit, in words
///
/// # Returns
/// All distinct phrases of 1..=`max_words` consecutive tokens joined by a
/// single space
pub fn generate_candidates<S: AsRef<str>>(tokens: &[S], max_words: usize) -> BTreeSet<String> {
    windows(tokens, max_words).collect()
}

/// Number of raw windows before deduplication.
///
/// Equals `sum(max(0, len - n + 1))` for `n` in `1..=min(max_words, len)`.
pub fn window_count(len: usize, max_words: usize) -> usize {
    (1..=max_words.min(len)).map(|n| len - n + 1).sum()
}

fn windows<S: AsRef<str>>(tokens: &[S], max_words: usize) -> impl Iterator<Item = String> + '_ {
    (1..=max_words.min(tokens.len())).flat_map(move |n| {
        tokens.windows(n).map(|window| {
            window
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .join(" ")
        })
    })
}
