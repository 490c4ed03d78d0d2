//! Field-level comparison of two versions of the same record.
//!
//! Structured values (`value`, `raw`, `extensions`) compare by deep
//! equality, scalar fields by direct equality where two absent values are
//! equal, and provenance sequences positionally.

use tokendiff_types::{Deprecation, FieldChange, Pointer, RecordSnapshot};

/// Compute the fields that differ between `previous` and `next`.
///
/// The result is in [`FieldChange::ALL`] order with no duplicates. An empty
/// result means the record is unchanged.
pub fn diff_fields(previous: &RecordSnapshot, next: &RecordSnapshot) -> Vec<FieldChange> {
    FieldChange::ALL
        .into_iter()
        .filter(|&field| !field_equal(field, previous, next))
        .collect()
}

/// Whether a single field is equal on both snapshots.
pub fn field_equal(field: FieldChange, previous: &RecordSnapshot, next: &RecordSnapshot) -> bool {
    match field {
        FieldChange::Value => previous.value == next.value,
        FieldChange::Raw => previous.raw == next.raw,
        FieldChange::Ref => previous.reference == next.reference,
        FieldChange::Type => previous.token_type == next.token_type,
        FieldChange::Description => previous.description == next.description,
        FieldChange::Extensions => previous.extensions == next.extensions,
        FieldChange::Deprecated => {
            deprecation_equal(previous.deprecated.as_ref(), next.deprecated.as_ref())
        }
        FieldChange::References => pointers_equal(&previous.references, &next.references),
        FieldChange::ResolutionPath => {
            pointers_equal(&previous.resolution_path, &next.resolution_path)
        }
        FieldChange::AppliedAliases => {
            pointers_equal(&previous.applied_aliases, &next.applied_aliases)
        }
    }
}

/// Deprecation equality: both absent, or matching reason, since and
/// superseding pointer.
pub fn deprecation_equal(previous: Option<&Deprecation>, next: Option<&Deprecation>) -> bool {
    match (previous, next) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            a.reason == b.reason
                && a.since == b.since
                && pointer_option_equal(a.superseded_by.as_ref(), b.superseded_by.as_ref())
        }
        _ => false,
    }
}

/// Sequences are equal when they have the same length and pointer-equal
/// entries at every position.
pub fn pointers_equal(previous: &[Pointer], next: &[Pointer]) -> bool {
    previous.len() == next.len()
        && previous
            .iter()
            .zip(next)
            .all(|(a, b)| pointer_equal(a, b))
}

fn pointer_equal(a: &Pointer, b: &Pointer) -> bool {
    a.uri == b.uri && a.pointer == b.pointer && a.external == b.external
}

fn pointer_option_equal(a: Option<&Pointer>, b: Option<&Pointer>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => pointer_equal(a, b),
        _ => false,
    }
}
