//! Ingredient and sponsor catalog for Pantry.
//!
//! The catalog is the vocabulary owner for the matcher: it stores typed
//! ingredient and sponsor rows, persists them as a JSON snapshot, and keeps an
//! [`IngredientMatcher`](pantry_search::IngredientMatcher) rebuilt after every
//! ingredient change.
//!
//! # Example
//!
//! ```rust
//! use pantry_catalog::{Catalog, NewIngredient};
//!
//! let catalog = Catalog::default();
//! catalog.add_ingredient(NewIngredient::new("olive oil", "", 8.5)).unwrap();
//! catalog.add_ingredient(NewIngredient::new("salt", "", 3.0)).unwrap();
//!
//! let report = catalog.match_text("olive oil and salt").unwrap();
//! assert_eq!(report.average_score, 5.75);
//! ```

mod error;
mod records;
mod snapshot;
mod store;

pub use error::{CatalogError, Result};
pub use records::{
    IngredientRecord, IngredientUpdate, NewIngredient, NewSponsor, Page, SponsorRecord,
};
pub use snapshot::CatalogSnapshot;
pub use store::Catalog;
