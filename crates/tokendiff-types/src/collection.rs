//! Record collections: one side (previous or next) of a comparison.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::snapshot::RecordSnapshot;

/// Records keyed by id. Iteration is in id order.
pub type RecordMap = BTreeMap<String, RecordSnapshot>;

/// Anything that exposes an id-to-snapshot mapping.
///
/// Engine entry points are generic over this trait, so callers may pass a
/// bare [`RecordMap`] or a richer structure such as [`TokenSet`].
pub trait RecordSource {
    fn records(&self) -> &RecordMap;
}

impl RecordSource for RecordMap {
    fn records(&self) -> &RecordMap {
        self
    }
}

impl<T: RecordSource + ?Sized> RecordSource for &T {
    fn records(&self) -> &RecordMap {
        (**self).records()
    }
}

/// A labeled, versioned collection of records.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenSet {
    /// Human-readable label (e.g. the source file or package name).
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub records: RecordMap,
}

impl TokenSet {
    /// Create an empty token set.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            version: None,
            records: RecordMap::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Insert a record, keyed by its id. Returns the record it replaced.
    pub fn insert(&mut self, record: RecordSnapshot) -> Option<RecordSnapshot> {
        self.records.insert(record.id.clone(), record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSource for TokenSet {
    fn records(&self) -> &RecordMap {
        &self.records
    }
}

impl FromIterator<RecordSnapshot> for TokenSet {
    fn from_iter<I: IntoIterator<Item = RecordSnapshot>>(iter: I) -> Self {
        let mut set = TokenSet::default();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

/// Build a [`RecordMap`] from snapshots, keyed by their ids.
pub fn record_map<I: IntoIterator<Item = RecordSnapshot>>(records: I) -> RecordMap {
    records.into_iter().map(|r| (r.id.clone(), r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count<S: RecordSource>(source: S) -> usize {
        source.records().len()
    }

    #[test]
    fn map_and_token_set_are_both_sources() {
        let map = record_map([
            RecordSnapshot::from_dotted("a"),
            RecordSnapshot::from_dotted("b"),
        ]);
        let set: TokenSet = map.values().cloned().collect();

        assert_eq!(count(&map), 2);
        assert_eq!(count(&set), 2);
        assert_eq!(set.records(), &map);
    }

    #[test]
    fn insert_replaces_by_id() {
        let mut set = TokenSet::new("core").with_version("1.2.0");
        assert!(set.insert(RecordSnapshot::from_dotted("a")).is_none());
        let replaced = set.insert(RecordSnapshot::from_dotted("a").with_type("color"));
        assert!(replaced.is_some());
        assert_eq!(set.len(), 1);
        assert_eq!(set.version.as_deref(), Some("1.2.0"));
    }
}
