//! Rename detection: re-pair removals and additions that describe the same
//! record under a new identity.
//!
//! Pairing is greedy and order-dependent. Each removal, in input order,
//! takes the first not-yet-consumed addition, in input order, that the
//! [`RenameStrategy`] accepts. This is deliberately not a globally optimal
//! matching: callers rely on the pairing being stable for a given input
//! order.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use tokendiff_types::{Addition, FieldChange, RecordSnapshot, Removal, Rename};

use crate::compare::{field_equal, pointers_equal};
use crate::impact::ImpactStrategy;

/// Decides whether a removed record and an added record are the same record
/// renamed.
pub trait RenameStrategy: Send + Sync {
    fn matches(&self, previous: &RecordSnapshot, next: &RecordSnapshot) -> bool;
}

impl<F> RenameStrategy for F
where
    F: Fn(&RecordSnapshot, &RecordSnapshot) -> bool + Send + Sync,
{
    fn matches(&self, previous: &RecordSnapshot, next: &RecordSnapshot) -> bool {
        self(previous, next)
    }
}

/// Which fields participate in structural rename matching.
///
/// `id` and `path` never participate: a rename changes them by definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StructuralRenameStrategyOptions {
    pub include_value: bool,
    pub include_raw: bool,
    pub include_ref: bool,
    /// Types are compared trimmed and case-insensitively.
    pub include_type: bool,
    pub include_extensions: bool,
    pub include_deprecated: bool,
    pub include_references: bool,
}

impl Default for StructuralRenameStrategyOptions {
    fn default() -> Self {
        Self {
            include_value: true,
            include_raw: true,
            include_ref: true,
            include_type: true,
            include_extensions: true,
            include_deprecated: true,
            include_references: false,
        }
    }
}

impl StructuralRenameStrategyOptions {
    /// Match on resolved value and type only.
    pub fn value_only() -> Self {
        Self {
            include_value: true,
            include_raw: false,
            include_ref: false,
            include_type: true,
            include_extensions: false,
            include_deprecated: false,
            include_references: false,
        }
    }
}

/// Structural equality over a configurable subset of fields.
#[derive(Clone, Debug, Default)]
pub struct StructuralRenameStrategy {
    options: StructuralRenameStrategyOptions,
}

impl StructuralRenameStrategy {
    pub fn new(options: StructuralRenameStrategyOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &StructuralRenameStrategyOptions {
        &self.options
    }
}

impl RenameStrategy for StructuralRenameStrategy {
    fn matches(&self, previous: &RecordSnapshot, next: &RecordSnapshot) -> bool {
        let o = &self.options;
        (!o.include_value || field_equal(FieldChange::Value, previous, next))
            && (!o.include_raw || field_equal(FieldChange::Raw, previous, next))
            && (!o.include_ref || field_equal(FieldChange::Ref, previous, next))
            && (!o.include_type
                || normalized_type(previous.token_type.as_deref())
                    == normalized_type(next.token_type.as_deref()))
            && (!o.include_extensions || field_equal(FieldChange::Extensions, previous, next))
            && (!o.include_deprecated || field_equal(FieldChange::Deprecated, previous, next))
            && (!o.include_references || pointers_equal(&previous.references, &next.references))
    }
}

fn normalized_type(token_type: Option<&str>) -> Option<String> {
    token_type.map(|t| t.trim().to_lowercase())
}

/// A structural rename strategy, boxed for injection.
pub fn structural_rename_strategy(
    options: StructuralRenameStrategyOptions,
) -> Box<dyn RenameStrategy> {
    Box::new(StructuralRenameStrategy::new(options))
}

/// The default rename strategy: structural matching with default options.
pub fn default_rename_strategy() -> Box<dyn RenameStrategy> {
    structural_rename_strategy(StructuralRenameStrategyOptions::default())
}

/// Renames plus the removals and additions left unpaired.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenameOutcome {
    pub renamed: Vec<Rename>,
    pub removed: Vec<Removal>,
    pub added: Vec<Addition>,
}

/// Pair removals with additions into renames.
///
/// Unpaired entries keep their relative order.
pub fn detect_renames(
    removed: Vec<Removal>,
    added: Vec<Addition>,
    strategy: &dyn RenameStrategy,
    impact: &dyn ImpactStrategy,
) -> RenameOutcome {
    let mut consumed = vec![false; added.len()];
    let mut pairs: Vec<(Removal, usize)> = Vec::new();
    let mut remaining_removed = Vec::new();

    for removal in removed {
        let found = (0..added.len())
            .find(|&ai| !consumed[ai] && strategy.matches(&removal.previous, &added[ai].next));
        match found {
            Some(ai) => {
                consumed[ai] = true;
                pairs.push((removal, ai));
            }
            None => remaining_removed.push(removal),
        }
    }

    let mut slots: Vec<Option<Addition>> = added.into_iter().map(Some).collect();
    let mut renamed = Vec::with_capacity(pairs.len());
    for (removal, ai) in pairs {
        let Some(addition) = slots[ai].take() else {
            continue;
        };
        trace!(previous = %removal.id, next = %addition.id, "paired rename");
        let impact = impact.classify_rename(&removal.previous, &addition.next);
        renamed.push(Rename {
            previous_id: removal.id,
            next_id: addition.id,
            previous: removal.previous,
            next: addition.next,
            impact,
        });
    }
    let remaining_added: Vec<Addition> = slots.into_iter().flatten().collect();

    debug!(
        renamed = renamed.len(),
        removed = remaining_removed.len(),
        added = remaining_added.len(),
        "rename detection finished"
    );

    RenameOutcome {
        renamed,
        removed: remaining_removed,
        added: remaining_added,
    }
}
