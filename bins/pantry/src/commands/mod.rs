//! Subcommand implementations

pub mod ingredients;
pub mod matching;
pub mod sponsors;
pub mod token;

use anyhow::Result;
use pantry_catalog::{Catalog, Page};
use pantry_cli::progress;
use pantry_core::config::{Config, MatchingConfig};
use pantry_core::Error;
use pantry_search::MatchOptions;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// State shared by every subcommand
pub struct Context {
    pub config: Config,
    pub catalog_path: PathBuf,
    pub json: bool,
}

impl Context {
    pub fn new(config: Config, catalog: Option<PathBuf>, json: bool) -> Self {
        let catalog_path = catalog.unwrap_or_else(|| PathBuf::from(&config.schema.catalog.path));
        Self {
            config,
            catalog_path,
            json,
        }
    }

    pub fn match_options(&self) -> MatchOptions {
        match_options(&self.config.schema.matching)
    }

    /// Load the catalog snapshot, building the matcher
    pub fn open_catalog(&self) -> Result<Catalog> {
        pantry_telemetry::timed_span!("catalog.load");
        let spinner = progress::quiet(progress::spinner("Loading catalog..."), self.json);
        let catalog = Catalog::load(&self.catalog_path, self.match_options()).map_err(Error::from);
        spinner.finish_and_clear();

        let catalog = catalog?;
        debug!(
            path = %self.catalog_path.display(),
            ingredients = catalog.ingredient_count(),
            "Catalog opened"
        );
        Ok(catalog)
    }

    pub fn save_catalog(&self, catalog: &Catalog) -> Result<()> {
        catalog.save(&self.catalog_path).map_err(Error::from)?;
        Ok(())
    }

    /// Listing window, falling back to the configured page size
    pub fn page(&self, count: Option<usize>, after: usize) -> Page {
        Page {
            count: count.unwrap_or(self.config.schema.catalog.default_page_size),
            after,
        }
    }

    pub fn print_json(&self, value: &impl Serialize) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

pub fn match_options(config: &MatchingConfig) -> MatchOptions {
    MatchOptions {
        max_edit_ratio: config.max_edit_ratio,
        max_phrase_words: config.max_phrase_words,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use tempfile::TempDir;

    /// JSON-mode context over a catalog file in a fresh temp dir
    pub fn context() -> (TempDir, Context) {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(Config::default(), Some(dir.path().join("catalog.json")), true);
        (dir, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_path_override() {
        let ctx = Context::new(Config::default(), Some(PathBuf::from("/tmp/x.json")), false);
        assert_eq!(ctx.catalog_path, PathBuf::from("/tmp/x.json"));

        let ctx = Context::new(Config::default(), None, false);
        assert_eq!(ctx.catalog_path, PathBuf::from("pantry-catalog.json"));
    }

    #[test]
    fn test_page_defaults_to_config() {
        let ctx = Context::new(Config::default(), None, false);
        assert_eq!(ctx.page(None, 5), Page { count: 10, after: 5 });
        assert_eq!(ctx.page(Some(2), 0), Page { count: 2, after: 0 });
    }

    #[test]
    fn test_match_options_from_config() {
        let options = match_options(&MatchingConfig::default());
        assert_eq!(options, MatchOptions::default());
    }

    #[test]
    fn test_open_missing_catalog_is_empty() {
        let (_dir, ctx) = testing::context();
        assert_eq!(ctx.open_catalog().unwrap().ingredient_count(), 0);
    }
}
