//! Set-membership filter over a corpus snapshot.

use std::collections::HashSet;

use lexis_core::models::KeywordRecord;
use tracing::debug;

/// Candidates split into new records and a duplicate count.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FilterResult {
    pub new_records: Vec<KeywordRecord>,
    pub duplicate_count: usize,
}

/// Keep candidates whose text is not in `snapshot`, in generation order.
///
/// Each kept text is added to `snapshot` immediately, so a repeated text
/// within the batch counts as a duplicate of its first occurrence. Matching
/// is exact; no case or whitespace normalization.
pub fn filter_new(
    candidates: impl IntoIterator<Item = KeywordRecord>,
    snapshot: &mut HashSet<String>,
) -> FilterResult {
    let mut result = FilterResult::default();
    for candidate in candidates {
        if snapshot.insert(candidate.text().to_string()) {
            result.new_records.push(candidate);
        } else {
            debug!(keyword = candidate.text(), "skipping duplicate keyword");
            result.duplicate_count += 1;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str) -> KeywordRecord {
        KeywordRecord::new(text, None, None).unwrap()
    }

    #[test]
    fn drops_known_texts() {
        let mut snapshot: HashSet<String> = ["מניות".to_string()].into();
        let result = filter_new(vec![record("מניות"), record("תשואה")], &mut snapshot);
        assert_eq!(result.duplicate_count, 1);
        assert_eq!(result.new_records, vec![record("תשואה")]);
        assert!(snapshot.contains("תשואה"));
    }

    #[test]
    fn collapses_within_batch_repeats() {
        let mut snapshot = HashSet::new();
        let first = KeywordRecord::new("אג\"ח", Some("instruments".into()), None).unwrap();
        let second = KeywordRecord::new("אג\"ח", Some("trading".into()), None).unwrap();
        let result = filter_new(vec![first, second], &mut snapshot);
        assert_eq!(result.duplicate_count, 1);
        assert_eq!(result.new_records.len(), 1);
        assert_eq!(result.new_records[0].category(), "instruments");
    }

    #[test]
    fn matching_is_exact() {
        let mut snapshot: HashSet<String> = ["Stock".to_string()].into();
        let result = filter_new(vec![record("stock"), record("Stock ")], &mut snapshot);
        assert_eq!(result.duplicate_count, 0);
        assert_eq!(result.new_records.len(), 2);
    }
}
