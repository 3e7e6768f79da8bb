//! Property tests for the dedup filter.

use std::collections::HashSet;

use lexis_core::models::KeywordRecord;
use lexis_pipeline::filter_new;
use proptest::prelude::*;

fn records(texts: &[String]) -> Vec<KeywordRecord> {
    texts
        .iter()
        .filter_map(|t| KeywordRecord::new(t.clone(), None, None))
        .collect()
}

proptest! {
    /// New records are exactly the candidates not in the corpus, first
    /// occurrence only, in generation order.
    #[test]
    fn prop_new_records_are_the_set_difference(
        candidates in prop::collection::vec("[א-ת]{1,3}", 0..40),
        existing in prop::collection::hash_set("[א-ת]{1,3}", 0..20),
    ) {
        let candidates = records(&candidates);
        let mut snapshot = existing.clone();
        let result = filter_new(candidates.clone(), &mut snapshot);

        let mut seen = HashSet::new();
        let expected: Vec<&str> = candidates
            .iter()
            .map(|c| c.text())
            .filter(|t| !existing.contains(*t) && seen.insert(t.to_string()))
            .collect();
        let actual: Vec<&str> = result.new_records.iter().map(|r| r.text()).collect();

        prop_assert_eq!(actual, expected);
        prop_assert_eq!(
            result.duplicate_count + result.new_records.len(),
            candidates.len()
        );
    }

    /// The snapshot ends up holding the corpus plus every candidate text.
    #[test]
    fn prop_snapshot_absorbs_candidates(
        candidates in prop::collection::vec("[a-c]{1,2}", 0..30),
        existing in prop::collection::hash_set("[a-c]{1,2}", 0..8),
    ) {
        let candidates = records(&candidates);
        let mut snapshot = existing.clone();
        filter_new(candidates.clone(), &mut snapshot);

        let mut expected = existing;
        expected.extend(candidates.iter().map(|c| c.text().to_string()));
        prop_assert_eq!(snapshot, expected);
    }

    /// Filtering the same batch twice against the grown snapshot inserts nothing.
    #[test]
    fn prop_refiltering_is_idempotent(
        candidates in prop::collection::vec("[a-z]{1,4}", 0..30),
    ) {
        let candidates = records(&candidates);
        let mut snapshot = HashSet::new();
        filter_new(candidates.clone(), &mut snapshot);
        let again = filter_new(candidates.clone(), &mut snapshot);
        prop_assert!(again.new_records.is_empty());
        prop_assert_eq!(again.duplicate_count, candidates.len());
    }
}
