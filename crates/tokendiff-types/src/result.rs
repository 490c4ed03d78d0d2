//! The complete output of a diff.

use serde::{Deserialize, Serialize};

use crate::change::{Addition, ChangeRef, Modification, Removal, Rename};
use crate::summary::DiffSummary;

/// Additions, removals, modifications and renames between two collections,
/// together with their aggregated summary.
///
/// Every id appears in at most one of `added`, `removed`, `changed`, or one
/// side of `renamed`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffResult {
    pub added: Vec<Addition>,
    pub removed: Vec<Removal>,
    pub changed: Vec<Modification>,
    pub renamed: Vec<Rename>,
    pub summary: DiffSummary,
}

impl DiffResult {
    /// Every change, in added, removed, changed, renamed order.
    pub fn changes(&self) -> impl Iterator<Item = ChangeRef<'_>> + '_ {
        self.added
            .iter()
            .map(ChangeRef::Added)
            .chain(self.removed.iter().map(ChangeRef::Removed))
            .chain(self.changed.iter().map(ChangeRef::Changed))
            .chain(self.renamed.iter().map(ChangeRef::Renamed))
    }

    /// Number of change records across all four collections.
    pub fn total_changes(&self) -> usize {
        self.added.len() + self.removed.len() + self.changed.len() + self.renamed.len()
    }

    /// Returns `true` if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.total_changes() == 0
    }

    pub fn has_breaking_changes(&self) -> bool {
        self.changes().any(|c| c.impact().is_breaking())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::{ChangeKind, Impact};
    use crate::snapshot::RecordSnapshot;

    #[test]
    fn empty_result() {
        let diff = DiffResult::default();
        assert!(diff.is_empty());
        assert!(!diff.has_breaking_changes());
        assert_eq!(diff.changes().count(), 0);
    }

    #[test]
    fn changes_iterate_in_collection_order() {
        let diff = DiffResult {
            added: vec![Addition {
                id: "n".into(),
                next: RecordSnapshot::from_dotted("n"),
                impact: Impact::NonBreaking,
            }],
            removed: vec![Removal {
                id: "o".into(),
                previous: RecordSnapshot::from_dotted("o"),
                impact: Impact::Breaking,
            }],
            ..Default::default()
        };
        let kinds: Vec<_> = diff.changes().map(|c| c.kind()).collect();
        assert_eq!(kinds, vec![ChangeKind::Added, ChangeKind::Removed]);
        assert_eq!(diff.total_changes(), 2);
        assert!(diff.has_breaking_changes());
    }
}
