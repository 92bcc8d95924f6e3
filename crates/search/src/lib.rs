//! Approximate ingredient matching for Pantry.
//!
//! This crate provides:
//! - Text normalization and word n-gram candidate generation
//! - Levenshtein edit distance
//! - A BK-tree vocabulary index with length-proportional edit budgets
//! - Deduplicated, scored match reports
//!
//! # Example
//!
//! ```rust
//! use pantry_search::{IngredientMatcher, IngredientRecord};
//!
//! let matcher = IngredientMatcher::new(vec![
//!     IngredientRecord::new(1, "olive oil", "", 8.5),
//!     IngredientRecord::new(2, "salt", "", 3.0),
//! ]);
//!
//! let report = matcher.match_text("Extra virgin olive oil and salt, 2 tbsp.").unwrap();
//! assert_eq!(report.ingredient_ids(), vec![1, 2]);
//! assert_eq!(report.average_score, 5.75);
//! ```

mod aggregate;
mod candidates;
mod error;
mod fuzzy;
mod index;
mod matcher;
mod model;
mod normalize;
mod pipeline;

#[cfg(feature = "wasm")]
mod wasm;

pub use aggregate::aggregate;
pub use candidates::{generate_candidates, window_count, DEFAULT_MAX_PHRASE_WORDS};
pub use error::{Result, SearchError};
pub use fuzzy::{char_len, edit_budget, levenshtein_distance};
pub use index::{Hit, VocabularyIndex};
pub use matcher::{match_candidate, MatchOptions, DEFAULT_MAX_EDIT_RATIO};
pub use model::{
    canonical_name, IngredientRecord, MatchReport, MatchResponse, MatchResult, MatchedIngredient,
};
pub use normalize::normalize;
pub use pipeline::IngredientMatcher;
