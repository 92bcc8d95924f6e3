//! JSON snapshot of the catalog tables.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::records::{IngredientRecord, SponsorRecord};

/// On-disk form of a catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub ingredients: Vec<IngredientRecord>,
    #[serde(default)]
    pub sponsors: Vec<SponsorRecord>,
}

impl CatalogSnapshot {
    /// Read a snapshot; a missing file is an empty catalog.
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No catalog snapshot, starting empty");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let snapshot = serde_json::from_str(&content)?;
        Ok(snapshot)
    }

    /// Write a snapshot, replacing any previous file in one rename.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");

        fs::write(&tmp, serde_json::to_vec_pretty(self)?)?;
        fs::rename(&tmp, path)?;

        debug!(
            path = %path.display(),
            ingredients = self.ingredients.len(),
            sponsors = self.sponsors.len(),
            "Catalog snapshot written"
        );
        Ok(())
    }
}
