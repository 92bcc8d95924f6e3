//! WASM bindings for ingredient matching.

use wasm_bindgen::prelude::*;

use crate::{IngredientMatcher, IngredientRecord, MatchResponse, SearchError};

/// Match text against a vocabulary and return the response as JSON.
///
/// # Arguments
/// * `text` - Free text to scan for ingredients
/// * `vocabulary_json` - JSON array of `{id, name, description, score}` records
///
/// # Returns
/// `{"matched_ingredients": [...], "average_score": n}`, or `{"error": "..."}`
#[wasm_bindgen]
pub fn match_ingredients(text: &str, vocabulary_json: &str) -> String {
    match run(text, vocabulary_json) {
        Ok(response) => serde_json::to_string(&response)
            .unwrap_or_else(|e| error_json(&e.to_string())),
        Err(e) => error_json(&e.to_string()),
    }
}

/// Calculate Levenshtein edit distance between two strings.
#[wasm_bindgen]
pub fn edit_distance(a: &str, b: &str) -> usize {
    crate::levenshtein_distance(a, b)
}

fn run(text: &str, vocabulary_json: &str) -> crate::Result<MatchResponse> {
    let records: Vec<IngredientRecord> = serde_json::from_str(vocabulary_json)
        .map_err(|e| SearchError::InvalidVocabulary(e.to_string()))?;

    let report = IngredientMatcher::new(records).match_text(text)?;
    Ok(MatchResponse::from(report))
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}
