//! Text → match report pipeline.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::aggregate::aggregate;
use crate::candidates::generate_candidates;
use crate::error::{Result, SearchError};
use crate::index::VocabularyIndex;
use crate::matcher::{match_candidate, MatchOptions};
use crate::model::{IngredientRecord, MatchReport};
use crate::normalize::normalize;

/// Matches free text against a fixed vocabulary snapshot.
///
/// Immutable once built; share it behind an `Arc` and rebuild it when the
/// vocabulary changes.
#[derive(Debug, Default)]
pub struct IngredientMatcher {
    index: VocabularyIndex,
    options: MatchOptions,
}

impl IngredientMatcher {
    /// Build a matcher with default options.
    pub fn new(snapshot: impl IntoIterator<Item = IngredientRecord>) -> Self {
        Self {
            index: VocabularyIndex::build(snapshot),
            options: MatchOptions::default(),
        }
    }

    /// Build a matcher with explicit options.
    pub fn with_options(
        snapshot: impl IntoIterator<Item = IngredientRecord>,
        options: MatchOptions,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            index: VocabularyIndex::build(snapshot),
            options,
        })
    }

    /// The underlying vocabulary index.
    pub fn index(&self) -> &VocabularyIndex {
        &self.index
    }

    /// Options in effect.
    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Match one text.
    ///
    /// Candidates are visited in lexicographic order, so identical text and
    /// vocabulary always yield the same report.
    ///
    /// # Errors
    /// [`SearchError::EmptyInput`] when the text holds no words.
    pub fn match_text(&self, text: &str) -> Result<MatchReport> {
        let tokens = normalize(text);
        if tokens.is_empty() {
            return Err(SearchError::EmptyInput);
        }

        let candidates = generate_candidates(&tokens, self.options.max_phrase_words);
        trace!(tokens = tokens.len(), candidates = candidates.len(), "Generated candidates");

        let report = aggregate(
            candidates
                .iter()
                .filter_map(|candidate| match_candidate(&self.index, candidate, &self.options)),
        );

        debug!(
            candidates = candidates.len(),
            matched = report.matched.len(),
            average_score = report.average_score,
            "Matched text"
        );
        Ok(report)
    }

    /// Match many texts against the same vocabulary.
    ///
    /// Results are returned in input order. With the `parallel` feature the
    /// texts are spread over the rayon pool; each text is still processed
    /// sequentially.
    pub fn match_batch<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<Result<MatchReport>> {
        #[cfg(feature = "parallel")]
        {
            texts.par_iter().map(|text| self.match_text(text.as_ref())).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            texts.iter().map(|text| self.match_text(text.as_ref())).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> IngredientMatcher {
        IngredientMatcher::new(vec![
            IngredientRecord::new(1, "olive oil", "", 8.5),
            IngredientRecord::new(2, "salt", "", 3.0),
        ])
    }

    #[test]
    fn test_empty_input_rejected() {
        let matcher = matcher();
        assert!(matches!(matcher.match_text(""), Err(SearchError::EmptyInput)));
        assert!(matches!(matcher.match_text("   "), Err(SearchError::EmptyInput)));
        assert!(matches!(matcher.match_text("\r\n"), Err(SearchError::EmptyInput)));
        assert!(matches!(matcher.match_text("?!"), Err(SearchError::EmptyInput)));
    }

    #[test]
    fn test_recipe_line() {
        let report = matcher()
            .match_text("Extra virgin olive oil and salt, 2 tbsp.")
            .unwrap();

        assert_eq!(report.ingredient_ids(), vec![1, 2]);
        assert_eq!(report.average_score, 5.75);
    }

    #[test]
    fn test_case_and_line_breaks_ignored() {
        let report = matcher().match_text("SALT\r\nOlive\nOil").unwrap();
        // "olive oil" sorts before "salt"
        assert_eq!(report.ingredient_ids(), vec![1, 2]);
    }

    #[test]
    fn test_repeated_ingredient_counted_once() {
        let report = matcher().match_text("salt, salt and more salt").unwrap();
        assert_eq!(report.ingredient_ids(), vec![2]);
        assert_eq!(report.average_score, 3.0);
    }

    #[test]
    fn test_unrelated_text() {
        let report = matcher().match_text("the quick brown fox").unwrap();
        assert!(report.is_empty());
        assert_eq!(report.average_score, 0.0);
    }

    #[test]
    fn test_deserialized_names_are_canonicalized() {
        let record: IngredientRecord =
            serde_json::from_str(r#"{"id": 1, "name": "Salt", "score": 3.0}"#).unwrap();
        let report = IngredientMatcher::new(vec![record]).match_text("salt").unwrap();
        assert_eq!(report.ingredient_ids(), vec![1]);
        assert_eq!(report.matched[0].name, "salt");
    }

    #[test]
    fn test_punctuated_names_match_verbatim_text() {
        let matcher = IngredientMatcher::new(vec![
            IngredientRecord::new(1, "7-Up", "", 1.0),
            IngredientRecord::new(2, "m&m's", "", 2.0),
        ]);

        assert_eq!(matcher.match_text("a can of 7-Up").unwrap().ingredient_ids(), vec![1]);
        assert_eq!(matcher.match_text("m&m's").unwrap().ingredient_ids(), vec![2]);
    }

    #[test]
    fn test_idempotent() {
        let matcher = matcher();
        let text = "olive oil, salt and oliv oil";
        assert_eq!(matcher.match_text(text).unwrap(), matcher.match_text(text).unwrap());
    }

    #[test]
    fn test_with_options_validates() {
        let options = MatchOptions { max_phrase_words: 0, ..MatchOptions::default() };
        assert!(IngredientMatcher::with_options(Vec::new(), options).is_err());
    }

    #[test]
    fn test_short_phrase_limit() {
        let options = MatchOptions { max_phrase_words: 1, ..MatchOptions::default() };
        let matcher = IngredientMatcher::with_options(
            vec![IngredientRecord::new(1, "olive oil", "", 8.5)],
            options,
        )
        .unwrap();
        assert!(matcher.match_text("olive oil").unwrap().is_empty());
    }

    #[test]
    fn test_match_batch_keeps_order() {
        let matcher = matcher();
        let results = matcher.match_batch(&["salt", "", "olive oil"]);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().ingredient_ids(), vec![2]);
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().ingredient_ids(), vec![1]);
    }
}
