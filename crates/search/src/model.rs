//! Records, match results and the wire shape of a match report.

use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

/// An ingredient in the vocabulary.
///
/// `name` is the canonical lookup key (see [`canonical_name`]). Records
/// deserialized from elsewhere may carry any spelling; the index
/// canonicalizes them when it is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientRecord {
    /// Stable identifier
    pub id: i64,
    /// Canonical name
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Score contributed when matched
    pub score: f64,
}

impl IngredientRecord {
    /// Create a record, canonicalizing the name.
    pub fn new(id: i64, name: &str, description: impl Into<String>, score: f64) -> Self {
        Self {
            id,
            name: canonical_name(name),
            description: description.into(),
            score,
        }
    }
}

/// Canonical form of an ingredient name.
///
/// Uses the same rule as text normalization, so a name is always spelled the
/// way it appears among the candidates: punctuation stripped, lowercase,
/// single-spaced.
pub fn canonical_name(name: &str) -> String {
    normalize(name).join(" ")
}

/// One matched ingredient in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub ingredient_id: i64,
    pub name: String,
    pub description: String,
    pub score: f64,
}

impl From<&IngredientRecord> for MatchResult {
    fn from(record: &IngredientRecord) -> Self {
        Self {
            ingredient_id: record.id,
            name: record.name.clone(),
            description: record.description.clone(),
            score: record.score,
        }
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchReport {
    /// Distinct matches, in candidate order
    pub matched: Vec<MatchResult>,
    /// Mean score of `matched`, 0.0 when empty
    pub average_score: f64,
}

impl MatchReport {
    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }

    /// Matched ingredient ids, in report order.
    pub fn ingredient_ids(&self) -> Vec<i64> {
        self.matched.iter().map(|m| m.ingredient_id).collect()
    }
}

/// JSON body returned to clients for a match request.
///
/// ```json
/// {"matched_ingredients": [{"ingredient_id": 1, "ingredient_name": "salt",
///   "ingredient_description": "", "ingredient_score": 3.0}],
///  "average_score": 3.0}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    pub matched_ingredients: Vec<MatchedIngredient>,
    pub average_score: f64,
}

/// One entry of [`MatchResponse::matched_ingredients`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedIngredient {
    pub ingredient_id: i64,
    pub ingredient_name: String,
    pub ingredient_description: String,
    pub ingredient_score: f64,
}

impl From<MatchResult> for MatchedIngredient {
    fn from(m: MatchResult) -> Self {
        Self {
            ingredient_id: m.ingredient_id,
            ingredient_name: m.name,
            ingredient_description: m.description,
            ingredient_score: m.score,
        }
    }
}

impl From<MatchReport> for MatchResponse {
    fn from(report: MatchReport) -> Self {
        Self {
            matched_ingredients: report.matched.into_iter().map(Into::into).collect(),
            average_score: report.average_score,
        }
    }
}
