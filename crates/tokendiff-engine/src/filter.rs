//! Re-scoping an existing diff under filter criteria.
//!
//! Filtering never recomputes field comparisons or rename pairings; it
//! drops change records that fail the criteria and re-aggregates the
//! summary over a matching scope.

use std::collections::BTreeSet;

use tracing::debug;

use tokendiff_types::{
    format_pointer, parse_pointer, ChangeKind, ChangeRef, DiffFilter, DiffResult, Impact,
    RecordMap, RecordSnapshot, RecordSource,
};

use crate::error::{DiffError, DiffOutcome};
use crate::summary::{normalize_segments, summarize, ChangeLists, SummaryScope, SummaryStrategy};

/// A [`DiffFilter`] after validation and normalization.
///
/// A criterion is `None` when the caller gave no usable values for it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizedFilter {
    /// Lowercased, trimmed types.
    pub types: Option<BTreeSet<String>>,
    /// Canonical `#/a/b` pointer prefixes.
    pub paths: Option<BTreeSet<String>>,
    /// Lowercased group labels joined with `/`.
    pub groups: Option<BTreeSet<String>>,
    pub impacts: Option<BTreeSet<Impact>>,
    pub kinds: Option<BTreeSet<ChangeKind>>,
}

impl NormalizedFilter {
    /// Validate and normalize raw filter input.
    ///
    /// Blank entries are ignored. Unknown impacts or kinds and malformed
    /// pointers are rejected.
    pub fn from_filter(filter: &DiffFilter) -> DiffOutcome<Self> {
        let types = normalize_list(filter.types.as_deref(), |raw| {
            let t = raw.trim().to_lowercase();
            Ok((!t.is_empty()).then_some(t))
        })?;
        let paths = normalize_list(filter.paths.as_deref(), |raw| {
            normalize_path(raw).map_err(|e| DiffError::invalid_filter("path", raw, e))
        })?;
        let groups = normalize_list(filter.groups.as_deref(), |raw| Ok(normalize_group(raw)))?;
        let impacts = normalize_list(filter.impacts.as_deref(), |raw| {
            if raw.trim().is_empty() {
                return Ok(None);
            }
            raw.parse::<Impact>()
                .map(Some)
                .map_err(|e| DiffError::invalid_filter("impact", raw, e))
        })?;
        let kinds = normalize_list(filter.kinds.as_deref(), |raw| {
            if raw.trim().is_empty() {
                return Ok(None);
            }
            raw.parse::<ChangeKind>()
                .map(Some)
                .map_err(|e| DiffError::invalid_filter("kind", raw, e))
        })?;

        Ok(Self {
            types,
            paths,
            groups,
            impacts,
            kinds,
        })
    }

    /// Returns `true` if no criterion is active.
    pub fn is_empty(&self) -> bool {
        self.types.is_none()
            && self.paths.is_none()
            && self.groups.is_none()
            && self.impacts.is_none()
            && self.kinds.is_none()
    }

    /// Whether a record satisfies the type, group and path criteria.
    pub fn matches_record(&self, record: &RecordSnapshot, strategy: &dyn SummaryStrategy) -> bool {
        if let Some(types) = &self.types {
            if !types.contains(&strategy.type_label(record)) {
                return false;
            }
        }
        if let Some(groups) = &self.groups {
            if !strategy
                .group_labels(record)
                .iter()
                .any(|label| groups.contains(label))
            {
                return false;
            }
        }
        if let Some(paths) = &self.paths {
            let pointer = record.pointer();
            if !paths.iter().any(|prefix| pointer_has_prefix(&pointer, prefix)) {
                return false;
            }
        }
        true
    }

    /// Whether a change survives: kind, then impact, then the record
    /// criteria on whichever sides the change has.
    pub fn matches_change(&self, change: ChangeRef<'_>, strategy: &dyn SummaryStrategy) -> bool {
        if let Some(kinds) = &self.kinds {
            if !kinds.contains(&change.kind()) {
                return false;
            }
        }
        if let Some(impacts) = &self.impacts {
            if !impacts.contains(&change.impact()) {
                return false;
            }
        }
        change
            .previous()
            .into_iter()
            .chain(change.next())
            .any(|record| self.matches_record(record, strategy))
    }
}

fn normalize_list<T, F>(
    values: Option<&[String]>,
    mut normalize: F,
) -> DiffOutcome<Option<BTreeSet<T>>>
where
    T: Ord,
    F: FnMut(&str) -> DiffOutcome<Option<T>>,
{
    let Some(values) = values else {
        return Ok(None);
    };
    let mut out = BTreeSet::new();
    for raw in values {
        if let Some(value) = normalize(raw)? {
            out.insert(value);
        }
    }
    Ok((!out.is_empty()).then_some(out))
}

/// Canonicalize a path filter to `#/a/b`.
///
/// Strings starting with `#` or `/` are read as pointers; anything else is
/// a shorthand split on `.` or `/`.
fn normalize_path(raw: &str) -> Result<Option<String>, tokendiff_types::TypeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let segments: Vec<String> = if trimmed.starts_with('#') || trimmed.starts_with('/') {
        parse_pointer(trimmed)?
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect()
    } else {
        trimmed
            .split(['.', '/'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    };
    Ok(Some(format_pointer(&segments)))
}

/// Canonicalize a group filter: split on `/`, `\` or `>`, then normalize
/// segments the same way group labels are built.
fn normalize_group(raw: &str) -> Option<String> {
    let parts: Vec<&str> = raw.split(['/', '\\', '>']).collect();
    let segments = normalize_segments(&parts);
    (!segments.is_empty()).then(|| segments.join("/"))
}

fn pointer_has_prefix(pointer: &str, prefix: &str) -> bool {
    match pointer.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Apply `filter` to an existing diff and re-aggregate its summary.
///
/// An empty filter returns the diff unchanged.
pub fn filter_diff_with<P, N>(
    diff: &DiffResult,
    previous: P,
    next: N,
    filter: &DiffFilter,
    strategy: &dyn SummaryStrategy,
) -> DiffOutcome<DiffResult>
where
    P: RecordSource,
    N: RecordSource,
{
    let normalized = NormalizedFilter::from_filter(filter)?;
    if normalized.is_empty() {
        return Ok(diff.clone());
    }
    debug!(filter = ?normalized, "filtering diff");

    let mut excluded = SummaryScope::new();
    let mut keep = |change: ChangeRef<'_>| {
        let matched = normalized.matches_change(change, strategy);
        if !matched {
            if let Some(id) = change.previous_id() {
                excluded.previous.insert(id.to_string());
            }
            if let Some(id) = change.next_id() {
                excluded.next.insert(id.to_string());
            }
        }
        matched
    };

    let mut filtered = DiffResult {
        added: diff
            .added
            .iter()
            .filter(|a| keep(ChangeRef::Added(*a)))
            .cloned()
            .collect(),
        removed: diff
            .removed
            .iter()
            .filter(|r| keep(ChangeRef::Removed(*r)))
            .cloned()
            .collect(),
        changed: diff
            .changed
            .iter()
            .filter(|m| keep(ChangeRef::Changed(*m)))
            .cloned()
            .collect(),
        renamed: diff
            .renamed
            .iter()
            .filter(|r| keep(ChangeRef::Renamed(*r)))
            .cloned()
            .collect(),
        summary: Default::default(),
    };

    let previous = previous.records();
    let next = next.records();
    let scope = if normalized.kinds.is_some() {
        surviving_scope(&filtered)
    } else {
        matching_scope(previous, next, &normalized, &excluded, strategy)
    };
    debug!(
        excluded_previous = excluded.previous.len(),
        excluded_next = excluded.next.len(),
        scope_previous = scope.previous.len(),
        scope_next = scope.next.len(),
        "filter scope built"
    );

    filtered.summary = summarize(
        previous,
        next,
        ChangeLists::from_result(&filtered),
        Some(&scope),
        strategy,
    );
    Ok(filtered)
}

/// Scope holding exactly the ids of the changes that survived.
fn surviving_scope(diff: &DiffResult) -> SummaryScope {
    let mut scope = SummaryScope::new();
    for change in diff.changes() {
        if let Some(id) = change.previous_id() {
            scope.previous.insert(id.to_string());
        }
        if let Some(id) = change.next_id() {
            scope.next.insert(id.to_string());
        }
    }
    scope
}

/// Scope holding every record satisfying the record criteria on its own
/// side, minus the ids of changes the filter dropped.
fn matching_scope(
    previous: &RecordMap,
    next: &RecordMap,
    filter: &NormalizedFilter,
    excluded: &SummaryScope,
    strategy: &dyn SummaryStrategy,
) -> SummaryScope {
    let side = |records: &RecordMap, excluded: &BTreeSet<String>| -> BTreeSet<String> {
        records
            .iter()
            .filter(|(id, _)| !excluded.contains(*id))
            .filter(|(_, record)| filter.matches_record(record, strategy))
            .map(|(id, _)| id.clone())
            .collect()
    };
    SummaryScope {
        previous: side(previous, &excluded.previous),
        next: side(next, &excluded.next),
    }
}
