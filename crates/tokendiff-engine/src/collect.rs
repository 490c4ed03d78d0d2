//! Change collection: one pass over both collections.
//!
//! Ids present only in `previous` become removals, ids present only in
//! `next` become additions, and ids present on both sides with differing
//! fields become modifications. Renames are not detected here; see
//! [`crate::rename`].

use tracing::debug;

use tokendiff_types::{Addition, Modification, RecordMap, Removal};

use crate::compare::diff_fields;
use crate::impact::ImpactStrategy;

/// Raw changes before rename pairing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollectedChanges {
    pub added: Vec<Addition>,
    pub removed: Vec<Removal>,
    pub changed: Vec<Modification>,
}

impl CollectedChanges {
    /// Returns `true` if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// Walk `previous` then `next` once and collect raw changes.
///
/// Each list is in id order.
pub fn collect_changes(
    previous: &RecordMap,
    next: &RecordMap,
    impact: &dyn ImpactStrategy,
) -> CollectedChanges {
    let mut out = CollectedChanges::default();

    // Removed and modified records.
    for (id, prev) in previous {
        match next.get(id) {
            Some(curr) => {
                let changes = diff_fields(prev, curr);
                if !changes.is_empty() {
                    let impact = impact.classify_modification(prev, curr, &changes);
                    out.changed.push(Modification {
                        id: id.clone(),
                        previous: prev.clone(),
                        next: curr.clone(),
                        changes,
                        impact,
                    });
                }
            }
            None => {
                out.removed.push(Removal {
                    id: id.clone(),
                    previous: prev.clone(),
                    impact: impact.classify_removal(prev),
                });
            }
        }
    }

    // Added records.
    for (id, curr) in next {
        if !previous.contains_key(id) {
            out.added.push(Addition {
                id: id.clone(),
                next: curr.clone(),
                impact: impact.classify_addition(curr),
            });
        }
    }

    debug!(
        previous = previous.len(),
        next = next.len(),
        added = out.added.len(),
        removed = out.removed.len(),
        changed = out.changed.len(),
        "collected raw changes"
    );

    out
}
