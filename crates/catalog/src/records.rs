//! Typed catalog rows and the inputs used to create or change them.

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

pub use pantry_search::IngredientRecord;

/// Fields for a new ingredient. The catalog assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewIngredient {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub score: f64,
}

impl NewIngredient {
    pub fn new(name: impl Into<String>, description: impl Into<String>, score: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            score,
        }
    }
}

/// Partial update of an ingredient; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngredientUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub score: Option<f64>,
}

/// A sponsor and the product it promotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SponsorRecord {
    pub id: i64,
    pub sponsor_name: String,
    pub product_name: String,
    #[serde(default)]
    pub product_description: String,
    /// URL or path of the product picture
    #[serde(default)]
    pub product_picture: String,
}

/// Fields for a new sponsor. The catalog assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSponsor {
    pub sponsor_name: String,
    pub product_name: String,
    #[serde(default)]
    pub product_description: String,
    #[serde(default)]
    pub product_picture: String,
}

impl NewSponsor {
    pub(crate) fn into_record(self, id: i64) -> SponsorRecord {
        SponsorRecord {
            id,
            sponsor_name: self.sponsor_name.trim().to_string(),
            product_name: self.product_name.trim().to_string(),
            product_description: self.product_description,
            product_picture: self.product_picture,
        }
    }
}

/// Limit/offset window over a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Maximum rows to return
    pub count: usize,
    /// Rows to skip
    pub after: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self { count: 10, after: 0 }
    }
}

pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CatalogError::InvalidRecord(
            "ingredient name must not be empty".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_score(score: f64) -> Result<()> {
    if !score.is_finite() {
        return Err(CatalogError::InvalidRecord(format!(
            "ingredient score must be finite, got {}",
            score
        )));
    }
    Ok(())
}

pub(crate) fn validate_sponsor(sponsor: &SponsorRecord) -> Result<()> {
    if sponsor.sponsor_name.is_empty() {
        return Err(CatalogError::InvalidRecord(
            "sponsor_name must not be empty".to_string(),
        ));
    }
    if sponsor.product_name.is_empty() {
        return Err(CatalogError::InvalidRecord(
            "product_name must not be empty".to_string(),
        ));
    }
    Ok(())
}
