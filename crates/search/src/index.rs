//! Vocabulary index.
//!
//! A BK-tree keyed by Levenshtein distance over canonical ingredient names,
//! plus a name map that answers exact lookups without touching the tree.
//! The name map also resolves every name the tree returns back to its record.

use std::collections::HashMap;
use std::fmt;

use bk_tree::{metrics::Levenshtein, BKTree};
use tracing::{debug, warn};

use crate::fuzzy::levenshtein_distance;
use crate::model::{canonical_name, IngredientRecord};

/// Longest UTF-8 encoding of one char, in bytes.
const MAX_CHAR_BYTES: usize = 4;

/// A vocabulary entry found within some distance of a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<'a> {
    /// Edit distance between the query and `record.name`, in chars
    pub distance: usize,
    /// The matched record
    pub record: &'a IngredientRecord,
}

/// Read-only fuzzy index over a vocabulary snapshot.
///
/// Names are canonicalized on build. Every indexed name maps to exactly one
/// record; when a snapshot carries the same name twice the record with the
/// lowest id is kept.
pub struct VocabularyIndex {
    records: Vec<IngredientRecord>,
    by_name: HashMap<String, usize>,
    tree: BKTree<String, Levenshtein>,
    ascii: bool,
}

impl Default for VocabularyIndex {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            by_name: HashMap::new(),
            tree: BKTree::new(Levenshtein),
            ascii: true,
        }
    }
}

impl fmt::Debug for VocabularyIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VocabularyIndex")
            .field("entries", &self.records.len())
            .field("ascii", &self.ascii)
            .finish()
    }
}

impl VocabularyIndex {
    /// Build an index from a vocabulary snapshot.
    pub fn build(snapshot: impl IntoIterator<Item = IngredientRecord>) -> Self {
        let mut records: Vec<IngredientRecord> = snapshot
            .into_iter()
            .map(|mut record| {
                record.name = canonical_name(&record.name);
                record
            })
            .collect();
        records.sort_by_key(|r| r.id);

        let mut index = Self::default();
        for record in records {
            if record.name.is_empty() {
                warn!(id = record.id, "Ingredient name has no words, skipping");
                continue;
            }
            if let Some(&existing) = index.by_name.get(&record.name) {
                warn!(
                    name = %record.name,
                    kept_id = index.records[existing].id,
                    dropped_id = record.id,
                    "Duplicate ingredient name in vocabulary"
                );
                continue;
            }
            index.insert(record);
        }

        debug!(entries = index.records.len(), "Vocabulary index built");
        index
    }

    fn insert(&mut self, record: IngredientRecord) {
        self.ascii &= record.name.is_ascii();
        self.by_name.insert(record.name.clone(), self.records.len());
        self.tree.add(record.name.clone());
        self.records.push(record);
    }

    /// Number of indexed names.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index holds no names.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Indexed records, ordered by ascending id.
    pub fn records(&self) -> &[IngredientRecord] {
        &self.records
    }

    /// Look up a record by exact name.
    pub fn exact(&self, name: &str) -> Option<&IngredientRecord> {
        self.by_name.get(name).map(|&slot| &self.records[slot])
    }

    /// All entries within `max_distance` edits of `query`, in no particular order.
    ///
    /// Distances are counted in chars. The tree measures bytes, so for
    /// non-ASCII names it is searched with a widened tolerance and every
    /// hit is re-measured.
    pub fn within(&self, query: &str, max_distance: usize) -> Vec<Hit<'_>> {
        if max_distance == 0 {
            return self
                .exact(query)
                .map(|record| Hit { distance: 0, record })
                .into_iter()
                .collect();
        }

        let tolerance = if self.ascii && query.is_ascii() {
            max_distance
        } else {
            max_distance.saturating_mul(MAX_CHAR_BYTES)
        };
        let tolerance = u32::try_from(tolerance).unwrap_or(u32::MAX);

        self.tree
            .find(query, tolerance)
            .into_iter()
            .filter_map(|(_, name)| {
                let record = self.exact(name)?;
                let distance = levenshtein_distance(query, name);
                (distance <= max_distance).then_some(Hit { distance, record })
            })
            .collect()
    }

    /// Closest entry within `max_distance` edits of `query`.
    ///
    /// Ties on distance go to the lowest ingredient id.
    pub fn best(&self, query: &str, max_distance: usize) -> Option<Hit<'_>> {
        self.within(query, max_distance)
            .into_iter()
            .min_by_key(|hit| (hit.distance, hit.record.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn vocabulary() -> VocabularyIndex {
        VocabularyIndex::build(vec![
            IngredientRecord::new(3, "olive oil", "", 8.5),
            IngredientRecord::new(1, "salt", "", 3.0),
            IngredientRecord::new(2, "malt", "", 2.0),
            IngredientRecord::new(4, "mozzarella cheese", "", 6.0),
            IngredientRecord::new(5, "basil", "", 1.5),
        ])
    }

    #[test]
    fn test_records_sorted_by_id() {
        let index = vocabulary();
        let ids: Vec<i64> = index.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_exact_lookup() {
        let index = vocabulary();
        assert_eq!(index.exact("basil").map(|r| r.id), Some(5));
        assert!(index.exact("basi").is_none());
    }

    #[test]
    fn test_within_zero_is_exact() {
        let index = vocabulary();
        let hits = index.within("salt", 0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.id, 1);
        assert!(index.within("sal", 0).is_empty());
    }

    #[test]
    fn test_within_finds_close_names() {
        let index = vocabulary();
        let mut ids: Vec<i64> = index.within("halt", 1).iter().map(|h| h.record.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_best_prefers_lower_id_on_tie() {
        let index = vocabulary();
        let hit = index.best("halt", 1).unwrap();
        assert_eq!(hit.distance, 1);
        assert_eq!(hit.record.id, 1);
    }

    #[test]
    fn test_best_prefers_lower_distance() {
        let index = vocabulary();
        let hit = index.best("mozzarela cheese", 3).unwrap();
        assert_eq!(hit.record.id, 4);
        assert_eq!(hit.distance, 1);
    }

    #[test]
    fn test_duplicate_names_keep_lowest_id() {
        let index = VocabularyIndex::build(vec![
            IngredientRecord::new(9, "salt", "later", 1.0),
            IngredientRecord::new(2, "Salt", "first", 3.0),
        ]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.exact("salt").map(|r| r.id), Some(2));
    }

    #[test]
    fn test_build_canonicalizes_names() {
        let record: IngredientRecord =
            serde_json::from_str(r#"{"id": 1, "name": "  Sea SALT! ", "score": 3.0}"#).unwrap();
        let index = VocabularyIndex::build(vec![record]);

        assert_eq!(index.exact("sea salt").map(|r| r.id), Some(1));
        assert_eq!(index.records()[0].name, "sea salt");
        assert_eq!(index.best("sea slt", 1).map(|h| h.record.id), Some(1));
    }

    #[test]
    fn test_wordless_names_are_skipped() {
        let index = VocabularyIndex::build(vec![
            IngredientRecord::new(1, "!!!", "", 1.0),
            IngredientRecord::new(2, "salt", "", 3.0),
        ]);
        assert_eq!(index.len(), 1);
        assert!(index.within("", 1).is_empty());
    }

    #[test]
    fn test_non_ascii_distance_in_chars() {
        let index = VocabularyIndex::build(vec![IngredientRecord::new(1, "crème fraîche", "", 4.0)]);

        // Two char edits, four byte edits
        let hit = index.best("creme fraiche", 2).unwrap();
        assert_eq!(hit.distance, 2);
        assert!(index.best("creme fraiche", 1).is_none());
    }

    #[test]
    fn test_empty_index() {
        let index = VocabularyIndex::build(Vec::new());
        assert!(index.is_empty());
        assert!(index.within("salt", 2).is_empty());
        assert!(index.best("salt", 2).is_none());
    }

    proptest! {
        #[test]
        fn prop_within_agrees_with_linear_scan_unicode(
            names in proptest::collection::btree_set("[aéb]{1,5}", 1..20),
            query in "[aéb]{0,6}",
            max_distance in 0usize..4,
        ) {
            let records: Vec<IngredientRecord> = names
                .iter()
                .enumerate()
                .map(|(i, name)| IngredientRecord::new(i as i64, name, "", 1.0))
                .collect();
            let index = VocabularyIndex::build(records.clone());

            let mut from_tree: Vec<i64> =
                index.within(&query, max_distance).iter().map(|h| h.record.id).collect();
            from_tree.sort_unstable();

            let from_scan: Vec<i64> = records
                .iter()
                .filter(|r| levenshtein_distance(&query, &r.name) <= max_distance)
                .map(|r| r.id)
                .collect();

            prop_assert_eq!(from_tree, from_scan);
        }

        #[test]
        fn prop_within_agrees_with_linear_scan(
            names in proptest::collection::btree_set("[a-d]{1,6}", 1..30),
            query in "[a-d]{0,7}",
            max_distance in 0usize..4,
        ) {
            let records: Vec<IngredientRecord> = names
                .iter()
                .enumerate()
                .map(|(i, name)| IngredientRecord::new(i as i64, name, "", 1.0))
                .collect();
            let index = VocabularyIndex::build(records.clone());

            let mut from_tree: Vec<i64> =
                index.within(&query, max_distance).iter().map(|h| h.record.id).collect();
            from_tree.sort_unstable();

            let from_scan: Vec<i64> = records
                .iter()
                .filter(|r| levenshtein_distance(&query, &r.name) <= max_distance)
                .map(|r| r.id)
                .collect();

            prop_assert_eq!(from_tree, from_scan);
        }
    }
}
