//! Compatibility classification of individual changes.

use tokendiff_types::{FieldChange, Impact, RecordSnapshot};

/// Assigns a compatibility impact to a single change.
///
/// The trait is object-safe and `Send + Sync` so a strategy can be stored
/// in a `Box<dyn ImpactStrategy>` and shared across diff invocations.
pub trait ImpactStrategy: Send + Sync {
    fn classify_addition(&self, next: &RecordSnapshot) -> Impact;

    fn classify_removal(&self, previous: &RecordSnapshot) -> Impact;

    fn classify_rename(&self, previous: &RecordSnapshot, next: &RecordSnapshot) -> Impact;

    fn classify_modification(
        &self,
        previous: &RecordSnapshot,
        next: &RecordSnapshot,
        changes: &[FieldChange],
    ) -> Impact;
}

/// The default compatibility policy.
///
/// - additions are non-breaking
/// - removals and renames are breaking: consumers addressing the old
///   identity lose it
/// - modifications are breaking when the record's `type` or alias `ref`
///   changed; value, metadata and provenance edits are not
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultImpactStrategy;

impl ImpactStrategy for DefaultImpactStrategy {
    fn classify_addition(&self, _next: &RecordSnapshot) -> Impact {
        Impact::NonBreaking
    }

    fn classify_removal(&self, _previous: &RecordSnapshot) -> Impact {
        Impact::Breaking
    }

    fn classify_rename(&self, _previous: &RecordSnapshot, _next: &RecordSnapshot) -> Impact {
        Impact::Breaking
    }

    fn classify_modification(
        &self,
        _previous: &RecordSnapshot,
        _next: &RecordSnapshot,
        changes: &[FieldChange],
    ) -> Impact {
        if changes
            .iter()
            .any(|c| matches!(c, FieldChange::Type | FieldChange::Ref))
        {
            Impact::Breaking
        } else {
            Impact::NonBreaking
        }
    }
}

/// The default impact strategy, boxed for injection.
pub fn default_impact_strategy() -> Box<dyn ImpactStrategy> {
    Box::new(DefaultImpactStrategy)
}
