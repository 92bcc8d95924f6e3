//! Match deduplication and scoring.

use std::collections::HashSet;

use crate::model::{MatchReport, MatchResult};

/// Fold per-candidate matches into a report.
///
/// The first match for each ingredient id wins; later duplicates are dropped
/// without touching the score. The average is taken over kept matches and is
/// `0.0` when nothing matched.
pub fn aggregate(matches: impl IntoIterator<Item = MatchResult>) -> MatchReport {
    let mut seen = HashSet::new();
    let mut total = 0.0;

    let matched: Vec<MatchResult> = matches
        .into_iter()
        .filter(|m| seen.insert(m.ingredient_id))
        .inspect(|m| total += m.score)
        .collect();

    let average_score = if matched.is_empty() {
        0.0
    } else {
        total / matched.len() as f64
    };

    MatchReport { matched, average_score }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn result(id: i64, score: f64) -> MatchResult {
        MatchResult {
            ingredient_id: id,
            name: format!("ingredient {id}"),
            description: String::new(),
            score,
        }
    }

    #[test]
    fn test_empty() {
        let report = aggregate(Vec::new());
        assert!(report.is_empty());
        assert_eq!(report.average_score, 0.0);
    }

    #[test]
    fn test_average() {
        let report = aggregate(vec![result(1, 8.5), result(2, 3.0)]);
        assert_eq!(report.ingredient_ids(), vec![1, 2]);
        assert_eq!(report.average_score, 5.75);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let mut late = result(1, 8.5);
        late.name = "late".to_string();

        let report = aggregate(vec![result(2, 3.0), result(1, 8.5), late, result(2, 3.0)]);

        assert_eq!(report.ingredient_ids(), vec![2, 1]);
        assert_eq!(report.matched[1].name, "ingredient 1");
        assert_eq!(report.average_score, 5.75);
    }

    proptest! {
        #[test]
        fn prop_ids_unique_and_average_is_mean(
            raw in proptest::collection::vec((0i64..10, 0u8..100), 0..50)
        ) {
            let report = aggregate(raw.iter().map(|&(id, s)| result(id, f64::from(s))));

            let ids = report.ingredient_ids();
            let unique: HashSet<i64> = ids.iter().copied().collect();
            prop_assert_eq!(unique.len(), ids.len());

            if report.matched.is_empty() {
                prop_assert_eq!(report.average_score, 0.0);
            } else {
                let mean = report.matched.iter().map(|m| m.score).sum::<f64>()
                    / report.matched.len() as f64;
                prop_assert!((report.average_score - mean).abs() < 1e-9);
            }
        }
    }
}
