//! Per-candidate vocabulary matching.

use serde::{Deserialize, Serialize};

use crate::candidates::DEFAULT_MAX_PHRASE_WORDS;
use crate::error::{Result, SearchError};
use crate::fuzzy::{char_len, edit_budget};
use crate::index::VocabularyIndex;
use crate::model::MatchResult;

/// Default fraction of a candidate's length that may be edited.
pub const DEFAULT_MAX_EDIT_RATIO: f64 = 0.2;

/// Tunables for candidate generation and matching.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Edit budget as a fraction of candidate length in characters
    pub max_edit_ratio: f64,
    /// Longest candidate phrase, in words
    pub max_phrase_words: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            max_edit_ratio: DEFAULT_MAX_EDIT_RATIO,
            max_phrase_words: DEFAULT_MAX_PHRASE_WORDS,
        }
    }
}

impl MatchOptions {
    /// Check that the options describe a usable matcher.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.max_edit_ratio) {
            return Err(SearchError::InvalidOptions(format!(
                "max_edit_ratio must be within 0.0..=1.0, got {}",
                self.max_edit_ratio
            )));
        }
        if self.max_phrase_words == 0 {
            return Err(SearchError::InvalidOptions(
                "max_phrase_words must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Edit budget for one candidate phrase.
    pub fn budget_for(&self, candidate: &str) -> usize {
        edit_budget(char_len(candidate), self.max_edit_ratio)
    }
}

/// Find the best vocabulary match for one candidate.
///
/// # Arguments
/// * `index` - Vocabulary to search
/// * `candidate` - Normalized candidate phrase
/// * `options` - Budget configuration
///
/// # Returns
/// The closest entry within budget, ties going to the lowest id, or `None`
pub fn match_candidate(
    index: &VocabularyIndex,
    candidate: &str,
    options: &MatchOptions,
) -> Option<MatchResult> {
    let budget = options.budget_for(candidate);
    index
        .best(candidate, budget)
        .map(|hit| MatchResult::from(hit.record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IngredientRecord;

    fn index() -> VocabularyIndex {
        VocabularyIndex::build(vec![
            IngredientRecord::new(1, "olive oil", "cold pressed", 8.5),
            IngredientRecord::new(2, "salt", "", 3.0),
            IngredientRecord::new(3, "mozzarella cheese", "", 6.0),
        ])
    }

    #[test]
    fn test_exact_short_word_matches() {
        let m = match_candidate(&index(), "salt", &MatchOptions::default()).unwrap();
        assert_eq!(m.ingredient_id, 2);
        assert_eq!(m.score, 3.0);
    }

    #[test]
    fn test_short_word_has_no_typo_budget() {
        assert!(match_candidate(&index(), "salr", &MatchOptions::default()).is_none());
    }

    #[test]
    fn test_misspelling_within_budget() {
        let m = match_candidate(&index(), "mozzarela cheese", &MatchOptions::default()).unwrap();
        assert_eq!(m.ingredient_id, 3);
    }

    #[test]
    fn test_misspelling_over_budget() {
        // distance 2, budget floor(0.2 * 8) = 1
        assert!(match_candidate(&index(), "oliv oyl", &MatchOptions::default()).is_none());
    }

    #[test]
    fn test_wider_ratio_admits_more() {
        let options = MatchOptions { max_edit_ratio: 0.3, ..MatchOptions::default() };
        let m = match_candidate(&index(), "oliv oyl", &options).unwrap();
        assert_eq!(m.ingredient_id, 1);
        assert_eq!(m.description, "cold pressed");
    }

    #[test]
    fn test_validate() {
        assert!(MatchOptions::default().validate().is_ok());
        assert!(MatchOptions { max_edit_ratio: 1.5, ..MatchOptions::default() }.validate().is_err());
        assert!(MatchOptions { max_edit_ratio: f64::NAN, ..MatchOptions::default() }.validate().is_err());
        assert!(MatchOptions { max_phrase_words: 0, ..MatchOptions::default() }.validate().is_err());
    }
}
