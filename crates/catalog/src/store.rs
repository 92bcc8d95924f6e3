//! In-memory catalog with a live ingredient matcher.
//!
//! Ingredient and sponsor rows live in ordered maps keyed by id. Every
//! ingredient mutation rebuilds the [`IngredientMatcher`] from a fresh
//! snapshot and swaps it in; readers keep whichever matcher they already
//! cloned until they drop it.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use pantry_search::{canonical_name, IngredientMatcher, MatchOptions, MatchReport};
use tracing::{debug, info};

use crate::error::{CatalogError, Result};
use crate::records::{
    validate_name, validate_score, validate_sponsor, IngredientRecord, IngredientUpdate,
    NewIngredient, NewSponsor, Page, SponsorRecord,
};
use crate::snapshot::CatalogSnapshot;

#[derive(Debug, Default)]
struct Tables {
    ingredients: BTreeMap<i64, IngredientRecord>,
    sponsors: BTreeMap<i64, SponsorRecord>,
}

impl Tables {
    fn next_ingredient_id(&self) -> i64 {
        self.ingredients.keys().next_back().map_or(1, |id| id + 1)
    }

    fn next_sponsor_id(&self) -> i64 {
        self.sponsors.keys().next_back().map_or(1, |id| id + 1)
    }

    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.ingredients
            .values()
            .any(|r| r.name == name && Some(r.id) != except)
    }
}

/// Ingredient and sponsor tables plus the matcher built from them.
#[derive(Debug)]
pub struct Catalog {
    tables: RwLock<Tables>,
    matcher: RwLock<Arc<IngredientMatcher>>,
    options: MatchOptions,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            matcher: RwLock::new(Arc::new(IngredientMatcher::default())),
            options: MatchOptions::default(),
        }
    }
}

impl Catalog {
    /// Empty catalog with custom matching options.
    pub fn new(options: MatchOptions) -> Result<Self> {
        Self::from_snapshot(CatalogSnapshot::default(), options)
    }

    /// Build a catalog from a snapshot, validating every row.
    pub fn from_snapshot(snapshot: CatalogSnapshot, options: MatchOptions) -> Result<Self> {
        options.validate()?;

        let mut tables = Tables::default();
        for record in snapshot.ingredients {
            let record = IngredientRecord::new(record.id, &record.name, record.description, record.score);
            validate_name(&record.name)?;
            validate_score(record.score)?;
            if tables.name_taken(&record.name, None) {
                return Err(CatalogError::DuplicateName(record.name));
            }
            if tables.ingredients.contains_key(&record.id) {
                return Err(CatalogError::InvalidRecord(format!(
                    "duplicate ingredient id {}",
                    record.id
                )));
            }
            tables.ingredients.insert(record.id, record);
        }
        for sponsor in snapshot.sponsors {
            validate_sponsor(&sponsor)?;
            if tables.sponsors.contains_key(&sponsor.id) {
                return Err(CatalogError::InvalidRecord(format!(
                    "duplicate sponsor id {}",
                    sponsor.id
                )));
            }
            tables.sponsors.insert(sponsor.id, sponsor);
        }

        let matcher = build_matcher(&tables, options)?;
        Ok(Self {
            tables: RwLock::new(tables),
            matcher: RwLock::new(Arc::new(matcher)),
            options,
        })
    }

    /// Load a catalog from a JSON snapshot; a missing file yields an empty catalog.
    pub fn load(path: &Path, options: MatchOptions) -> Result<Self> {
        let catalog = Self::from_snapshot(CatalogSnapshot::read(path)?, options)?;
        info!(
            path = %path.display(),
            ingredients = catalog.ingredient_count(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Persist the catalog as a JSON snapshot.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.snapshot().write(path)
    }

    /// Copy of every row.
    pub fn snapshot(&self) -> CatalogSnapshot {
        let tables = self.read_tables();
        CatalogSnapshot {
            ingredients: tables.ingredients.values().cloned().collect(),
            sponsors: tables.sponsors.values().cloned().collect(),
        }
    }

    /// Matcher over the current vocabulary.
    pub fn matcher(&self) -> Arc<IngredientMatcher> {
        Arc::clone(&self.matcher.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Match text against the current vocabulary.
    pub fn match_text(&self, text: &str) -> Result<MatchReport> {
        Ok(self.matcher().match_text(text)?)
    }

    // Ingredients

    /// Add an ingredient, returning the stored row.
    pub fn add_ingredient(&self, new: NewIngredient) -> Result<IngredientRecord> {
        let mut tables = self.write_tables();

        let name = canonical_name(&new.name);
        validate_name(&name)?;
        validate_score(new.score)?;
        if tables.name_taken(&name, None) {
            return Err(CatalogError::DuplicateName(name));
        }

        let record = IngredientRecord::new(tables.next_ingredient_id(), &name, new.description, new.score);
        let matcher = self.prepare(tables.ingredients.values().cloned().chain([record.clone()]))?;
        tables.ingredients.insert(record.id, record.clone());
        self.install(matcher);

        info!(id = record.id, name = %record.name, "Ingredient added");
        Ok(record)
    }

    /// Apply a partial update, returning the new row.
    pub fn update_ingredient(&self, id: i64, update: IngredientUpdate) -> Result<IngredientRecord> {
        let mut tables = self.write_tables();

        let mut record = tables
            .ingredients
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::ingredient_not_found(id))?;

        if let Some(name) = update.name {
            let name = canonical_name(&name);
            validate_name(&name)?;
            if tables.name_taken(&name, Some(id)) {
                return Err(CatalogError::DuplicateName(name));
            }
            record.name = name;
        }
        if let Some(description) = update.description {
            record.description = description;
        }
        if let Some(score) = update.score {
            validate_score(score)?;
            record.score = score;
        }

        let matcher = self.prepare(
            tables
                .ingredients
                .values()
                .filter(|r| r.id != id)
                .cloned()
                .chain([record.clone()]),
        )?;
        tables.ingredients.insert(id, record.clone());
        self.install(matcher);

        info!(id, name = %record.name, "Ingredient updated");
        Ok(record)
    }

    /// Remove an ingredient, returning the removed row.
    pub fn remove_ingredient(&self, id: i64) -> Result<IngredientRecord> {
        let mut tables = self.write_tables();

        if !tables.ingredients.contains_key(&id) {
            return Err(CatalogError::ingredient_not_found(id));
        }
        let matcher = self.prepare(tables.ingredients.values().filter(|r| r.id != id).cloned())?;
        let record = tables
            .ingredients
            .remove(&id)
            .ok_or_else(|| CatalogError::ingredient_not_found(id))?;
        self.install(matcher);

        info!(id, name = %record.name, "Ingredient removed");
        Ok(record)
    }

    /// Look up one ingredient.
    pub fn ingredient(&self, id: i64) -> Result<IngredientRecord> {
        self.read_tables()
            .ingredients
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::ingredient_not_found(id))
    }

    /// A page of ingredients ordered by id.
    pub fn ingredients(&self, page: Page) -> Vec<IngredientRecord> {
        self.read_tables()
            .ingredients
            .values()
            .skip(page.after)
            .take(page.count)
            .cloned()
            .collect()
    }

    /// Number of ingredients.
    pub fn ingredient_count(&self) -> usize {
        self.read_tables().ingredients.len()
    }

    // Sponsors

    /// Add a sponsor, returning the stored row.
    pub fn add_sponsor(&self, new: NewSponsor) -> Result<SponsorRecord> {
        let mut tables = self.write_tables();

        let record = new.into_record(tables.next_sponsor_id());
        validate_sponsor(&record)?;
        tables.sponsors.insert(record.id, record.clone());

        info!(id = record.id, sponsor = %record.sponsor_name, "Sponsor added");
        Ok(record)
    }

    /// Replace a sponsor's fields, keeping its id.
    pub fn update_sponsor(&self, id: i64, fields: NewSponsor) -> Result<SponsorRecord> {
        let mut tables = self.write_tables();

        if !tables.sponsors.contains_key(&id) {
            return Err(CatalogError::sponsor_not_found(id));
        }
        let record = fields.into_record(id);
        validate_sponsor(&record)?;
        tables.sponsors.insert(id, record.clone());

        info!(id, sponsor = %record.sponsor_name, "Sponsor updated");
        Ok(record)
    }

    /// Remove a sponsor, returning the removed row.
    pub fn remove_sponsor(&self, id: i64) -> Result<SponsorRecord> {
        let record = self
            .write_tables()
            .sponsors
            .remove(&id)
            .ok_or_else(|| CatalogError::sponsor_not_found(id))?;

        info!(id, sponsor = %record.sponsor_name, "Sponsor removed");
        Ok(record)
    }

    /// A page of sponsors ordered by id.
    pub fn sponsors(&self, page: Page) -> Vec<SponsorRecord> {
        self.read_tables()
            .sponsors
            .values()
            .skip(page.after)
            .take(page.count)
            .cloned()
            .collect()
    }

    /// Build the matcher for the rows a mutation will leave behind.
    ///
    /// Called before the tables change, so a failed build leaves both the
    /// tables and the live matcher untouched.
    fn prepare(&self, rows: impl IntoIterator<Item = IngredientRecord>) -> Result<IngredientMatcher> {
        Ok(IngredientMatcher::with_options(rows, self.options)?)
    }

    fn install(&self, matcher: IngredientMatcher) {
        debug!(entries = matcher.index().len(), "Matcher rebuilt");
        *self.matcher.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(matcher);
    }

    fn read_tables(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_tables(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn build_matcher(tables: &Tables, options: MatchOptions) -> Result<IngredientMatcher> {
    let snapshot = tables.ingredients.values().cloned();
    Ok(IngredientMatcher::with_options(snapshot, options)?)
}
