//! Summary aggregation: fold change lists into global, per-type and
//! per-group counts.
//!
//! Aggregation can be restricted to a [`SummaryScope`], which limits the
//! previous-side and next-side ids that contribute to totals and to the
//! `unchanged` count. Change records themselves are always counted.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tokendiff_types::{
    Addition, ChangeCounts, ChangeRef, DiffResult, DiffSummary, DimensionSummary, Modification,
    RecordMap, RecordSnapshot, Removal, Rename, VersionBump,
};

/// Bucket label for records without a type.
pub const UNTYPED_LABEL: &str = "untyped";

/// Bucket label for records without an ancestor group.
pub const ROOT_GROUP_LABEL: &str = "root";

/// Borrowed view of the four change collections.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChangeLists<'a> {
    pub added: &'a [Addition],
    pub removed: &'a [Removal],
    pub changed: &'a [Modification],
    pub renamed: &'a [Rename],
}

impl<'a> ChangeLists<'a> {
    pub fn from_result(diff: &'a DiffResult) -> Self {
        Self {
            added: &diff.added,
            removed: &diff.removed,
            changed: &diff.changed,
            renamed: &diff.renamed,
        }
    }

    /// Every change, in added, removed, changed, renamed order.
    pub fn iter(&self) -> impl Iterator<Item = ChangeRef<'a>> + 'a {
        let Self {
            added,
            removed,
            changed,
            renamed,
        } = *self;
        added
            .iter()
            .map(ChangeRef::Added)
            .chain(removed.iter().map(ChangeRef::Removed))
            .chain(changed.iter().map(ChangeRef::Changed))
            .chain(renamed.iter().map(ChangeRef::Renamed))
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.changed.is_empty()
            && self.renamed.is_empty()
    }
}

/// The ids from each side that participate in an aggregation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SummaryScope {
    pub previous: BTreeSet<String>,
    pub next: BTreeSet<String>,
}

impl SummaryScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn includes_previous(&self, id: &str) -> bool {
        self.previous.contains(id)
    }

    pub fn includes_next(&self, id: &str) -> bool {
        self.next.contains(id)
    }
}

/// Controls how records are bucketed and which version bump is recommended.
pub trait SummaryStrategy: Send + Sync {
    /// The per-type bucket a record belongs to.
    ///
    /// Type filters are trimmed and lowercased before they are compared
    /// with this label, so labels must be normalized the same way as
    /// [`normalize_type_label`] or they will never match a filter.
    fn type_label(&self, snapshot: &RecordSnapshot) -> String;

    /// Every per-group bucket a record belongs to.
    ///
    /// Group filters are matched against these labels after lowercasing
    /// and joining segments with `/`, as [`ancestor_groups`] produces them.
    fn group_labels(&self, snapshot: &RecordSnapshot) -> Vec<String>;

    fn recommend_bump(&self, changes: &ChangeLists<'_>) -> VersionBump;
}

/// Default bucketing and bump policy.
///
/// - type label: trimmed, lowercased `type`, or `untyped`
/// - group labels: every proper ancestor of the trimmed, lowercased path,
///   joined with `/`, or `root` for paths of one segment or fewer
/// - bump: `none` without changes, `major` if anything is breaking,
///   `minor` if anything was added, otherwise `patch`
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultSummaryStrategy;

impl SummaryStrategy for DefaultSummaryStrategy {
    fn type_label(&self, snapshot: &RecordSnapshot) -> String {
        normalize_type_label(snapshot.token_type.as_deref())
    }

    fn group_labels(&self, snapshot: &RecordSnapshot) -> Vec<String> {
        ancestor_groups(&snapshot.path)
    }

    fn recommend_bump(&self, changes: &ChangeLists<'_>) -> VersionBump {
        if changes.is_empty() {
            VersionBump::None
        } else if changes.iter().any(|c| c.impact().is_breaking()) {
            VersionBump::Major
        } else if !changes.added.is_empty() {
            VersionBump::Minor
        } else {
            VersionBump::Patch
        }
    }
}

/// The default summary strategy, boxed for injection.
pub fn default_summary_strategy() -> Box<dyn SummaryStrategy> {
    Box::new(DefaultSummaryStrategy)
}

/// Normalize a type for bucketing: trimmed and lowercased, `untyped` when
/// absent or blank.
pub fn normalize_type_label(token_type: Option<&str>) -> String {
    match token_type.map(|t| t.trim().to_lowercase()) {
        Some(t) if !t.is_empty() => t,
        _ => UNTYPED_LABEL.to_string(),
    }
}

/// Normalize path segments: trimmed, lowercased, empty segments dropped.
pub fn normalize_segments<S: AsRef<str>>(segments: &[S]) -> Vec<String> {
    segments
        .iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Every proper ancestor group of a path.
///
/// `["color", "brand", "primary"]` belongs to `color` and `color/brand`.
pub fn ancestor_groups<S: AsRef<str>>(path: &[S]) -> Vec<String> {
    let segments = normalize_segments(path);
    if segments.len() <= 1 {
        return vec![ROOT_GROUP_LABEL.to_string()];
    }
    (1..segments.len())
        .map(|len| segments[..len].join("/"))
        .collect()
}

/// Aggregate a summary over `previous`, `next` and their change lists.
///
/// Without a scope every record on both sides participates.
pub fn summarize(
    previous: &RecordMap,
    next: &RecordMap,
    changes: ChangeLists<'_>,
    scope: Option<&SummaryScope>,
    strategy: &dyn SummaryStrategy,
) -> DiffSummary {
    let scoped_previous: Vec<&RecordSnapshot> = previous
        .iter()
        .filter(|(id, _)| scope.map_or(true, |s| s.includes_previous(id)))
        .map(|(_, r)| r)
        .collect();
    let scoped_next: Vec<&RecordSnapshot> = next
        .iter()
        .filter(|(id, _)| scope.map_or(true, |s| s.includes_next(id)))
        .map(|(_, r)| r)
        .collect();

    // Ids on the previous side that cannot count as unchanged.
    let touched: HashSet<&str> = changes
        .changed
        .iter()
        .map(|m| m.id.as_str())
        .chain(changes.removed.iter().map(|r| r.id.as_str()))
        .chain(changes.renamed.iter().map(|r| r.previous_id.as_str()))
        .collect();

    let unchanged: Vec<&RecordSnapshot> = scoped_next
        .iter()
        .copied()
        .filter(|r| !touched.contains(r.id.as_str()))
        .filter(|r| {
            previous.contains_key(&r.id) && scope.map_or(true, |s| s.includes_previous(&r.id))
        })
        .collect();

    let mut counts = ChangeCounts {
        total_previous: scoped_previous.len(),
        total_next: scoped_next.len(),
        unchanged: unchanged.len(),
        ..Default::default()
    };
    for change in changes.iter() {
        counts.record(change);
    }

    let mut types = Buckets::default();
    let mut groups = Buckets::default();

    for record in &scoped_previous {
        types.entry(strategy.type_label(record)).total_previous += 1;
        for label in strategy.group_labels(record) {
            groups.entry(label).total_previous += 1;
        }
    }
    for record in &scoped_next {
        types.entry(strategy.type_label(record)).total_next += 1;
        for label in strategy.group_labels(record) {
            groups.entry(label).total_next += 1;
        }
    }
    for record in &unchanged {
        types.entry(strategy.type_label(record)).unchanged += 1;
        for label in strategy.group_labels(record) {
            groups.entry(label).unchanged += 1;
        }
    }
    for change in changes.iter() {
        types.entry(strategy.type_label(change.preferred())).record(change);
        for label in change_groups(change, strategy) {
            groups.entry(label).record(change);
        }
    }

    DiffSummary {
        counts,
        recommended_bump: strategy.recommend_bump(&changes),
        types: types.into_summaries(),
        groups: groups.into_summaries(),
    }
}

/// Group labels of a change. A rename belongs to the groups of both its
/// previous and next paths.
fn change_groups(change: ChangeRef<'_>, strategy: &dyn SummaryStrategy) -> BTreeSet<String> {
    match change {
        ChangeRef::Renamed(r) => strategy
            .group_labels(&r.previous)
            .into_iter()
            .chain(strategy.group_labels(&r.next))
            .collect(),
        other => strategy.group_labels(other.preferred()).into_iter().collect(),
    }
}

#[derive(Default)]
struct Buckets(BTreeMap<String, ChangeCounts>);

impl Buckets {
    fn entry(&mut self, label: String) -> &mut ChangeCounts {
        self.0.entry(label).or_default()
    }

    fn into_summaries(self) -> Vec<DimensionSummary> {
        self.0
            .into_iter()
            .map(|(label, counts)| DimensionSummary { label, counts })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::collect_changes;
    use crate::impact::DefaultImpactStrategy;
    use crate::rename::{detect_renames, StructuralRenameStrategy};
    use serde_json::json;
    use tokendiff_types::{record_map, FieldChange, Impact};

    fn token(id: &str, token_type: &str, value: &str) -> RecordSnapshot {
        RecordSnapshot::from_dotted(id)
            .with_type(token_type)
            .with_value(json!(value))
    }

    /// Collect + rename + summarize with default strategies.
    fn full(previous: &RecordMap, next: &RecordMap) -> DiffResult {
        let raw = collect_changes(previous, next, &DefaultImpactStrategy);
        let renames = detect_renames(
            raw.removed,
            raw.added,
            &StructuralRenameStrategy::default(),
            &DefaultImpactStrategy,
        );
        let mut diff = DiffResult {
            added: renames.added,
            removed: renames.removed,
            changed: raw.changed,
            renamed: renames.renamed,
            ..Default::default()
        };
        diff.summary = summarize(
            previous,
            next,
            ChangeLists::from_result(&diff),
            None,
            &DefaultSummaryStrategy,
        );
        diff
    }

    #[test]
    fn ancestor_groups_cover_every_proper_prefix() {
        assert_eq!(
            ancestor_groups(&["Color", " Brand ", "primary", "hover"]),
            vec!["color", "color/brand", "color/brand/primary"]
        );
        assert_eq!(ancestor_groups(&["color", "brand"]), vec!["color"]);
        assert_eq!(ancestor_groups(&["solo"]), vec![ROOT_GROUP_LABEL]);
        assert_eq!(ancestor_groups::<&str>(&[]), vec![ROOT_GROUP_LABEL]);
        assert_eq!(ancestor_groups(&["", "solo"]), vec![ROOT_GROUP_LABEL]);
    }

    #[test]
    fn type_labels_normalize() {
        assert_eq!(normalize_type_label(Some(" Color ")), "color");
        assert_eq!(normalize_type_label(Some("  ")), UNTYPED_LABEL);
        assert_eq!(normalize_type_label(None), UNTYPED_LABEL);
    }

    #[test]
    fn empty_inputs_produce_empty_summary() {
        let diff = full(&RecordMap::new(), &RecordMap::new());
        assert_eq!(diff.summary, DiffSummary::default());
        assert_eq!(diff.summary.recommended_bump, VersionBump::None);
    }

    #[test]
    fn value_change_counts() {
        let prev = record_map([token("a", "color", "#fff")]);
        let next = record_map([token("a", "color", "#000")]);
        let s = full(&prev, &next).summary;

        assert_eq!(s.counts.changed, 1);
        assert_eq!(s.counts.value_changed, 1);
        assert_eq!(s.counts.metadata_changed, 0);
        assert_eq!(s.counts.unchanged, 0);
        assert_eq!(s.counts.non_breaking, 1);
        assert_eq!(s.recommended_bump, VersionBump::Patch);
    }

    #[test]
    fn metadata_only_change() {
        let prev = record_map([token("a", "color", "#fff")]);
        let next = record_map([token("a", "color", "#fff").with_description("brand white")]);
        let diff = full(&prev, &next);
        assert_eq!(diff.changed[0].changes, vec![FieldChange::Description]);
        assert_eq!(diff.summary.counts.metadata_changed, 1);
        assert_eq!(diff.summary.counts.value_changed, 0);
    }

    #[test]
    fn bump_rules() {
        let base = record_map([token("a", "color", "#fff")]);

        let added = record_map([token("a", "color", "#fff"), token("b", "color", "#111")]);
        assert_eq!(full(&base, &added).summary.recommended_bump, VersionBump::Minor);

        let removed = RecordMap::new();
        assert_eq!(full(&base, &removed).summary.recommended_bump, VersionBump::Major);

        assert_eq!(full(&base, &base).summary.recommended_bump, VersionBump::None);
    }

    #[test]
    fn unchanged_excludes_every_touched_id() {
        let prev = record_map([
            token("keep", "color", "1"),
            token("edit", "color", "2"),
            token("drop", "color", "3"),
            token("old", "dimension", "4px"),
        ]);
        let next = record_map([
            token("keep", "color", "1"),
            token("edit", "color", "9"),
            token("new", "dimension", "4px"),
            token("fresh", "color", "5"),
        ]);
        let diff = full(&prev, &next);
        let c = &diff.summary.counts;

        assert_eq!(diff.renamed.len(), 1);
        assert_eq!(c.total_previous, 4);
        assert_eq!(c.total_next, 4);
        assert_eq!(c.unchanged, 1);
        assert_eq!(c.total_previous, c.unchanged + c.changed + c.removed + c.renamed);
        assert_eq!(c.total_next, c.unchanged + c.changed + c.added + c.renamed);
        assert_eq!(c.breaking, 2); // drop + rename
        assert_eq!(diff.summary.recommended_bump, VersionBump::Major);
    }

    #[test]
    fn per_type_buckets_prefer_next_type() {
        let prev = record_map([
            token("a", "Color", "#fff"),
            RecordSnapshot::from_dotted("b").with_value(json!(1)),
        ]);
        let next = record_map([
            token("a", "dimension", "#fff"),
            RecordSnapshot::from_dotted("b").with_value(json!(1)),
        ]);
        let s = full(&prev, &next).summary;

        let labels: Vec<_> = s.types.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["color", "dimension", "untyped"]);

        let color = s.type_bucket("color").unwrap();
        assert_eq!(color.counts.total_previous, 1);
        assert_eq!(color.counts.changed, 0);

        let dimension = s.type_bucket("dimension").unwrap();
        assert_eq!(dimension.counts.total_next, 1);
        assert_eq!(dimension.counts.changed, 1);
        assert_eq!(dimension.counts.breaking, 1);

        let untyped = s.type_bucket("untyped").unwrap();
        assert_eq!(untyped.counts.unchanged, 1);
    }

    #[test]
    fn per_group_buckets_include_all_ancestors() {
        let prev = record_map([token("color.brand.primary.base", "color", "#fff")]);
        let next = record_map([token("color.brand.primary.base", "color", "#000")]);
        let s = full(&prev, &next).summary;

        let labels: Vec<_> = s.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["color", "color/brand", "color/brand/primary"]);
        assert!(s.groups.iter().all(|g| g.counts.changed == 1));
        assert!(s.groups.iter().all(|g| g.counts.total_previous == 1));
    }

    #[test]
    fn rename_groups_are_the_union_of_both_paths() {
        let prev = record_map([token("color.old.x", "color", "#fff")]);
        let next = record_map([token("color.new.x", "color", "#fff")]);
        let diff = full(&prev, &next);
        let s = &diff.summary;

        assert_eq!(diff.renamed.len(), 1);
        let labels: Vec<_> = s.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["color", "color/new", "color/old"]);
        // Counted once in the shared ancestor.
        assert_eq!(s.group_bucket("color").unwrap().counts.renamed, 1);
        assert_eq!(s.group_bucket("color/old").unwrap().counts.renamed, 1);
        assert_eq!(s.group_bucket("color/new").unwrap().counts.renamed, 1);
    }

    #[test]
    fn single_segment_paths_land_in_root() {
        let next = record_map([token("spacing", "dimension", "4px")]);
        let s = full(&RecordMap::new(), &next).summary;
        assert_eq!(s.groups.len(), 1);
        assert_eq!(s.groups[0].label, ROOT_GROUP_LABEL);
        assert_eq!(s.groups[0].counts.added, 1);
    }

    #[test]
    fn scope_restricts_totals_and_unchanged() {
        let prev = record_map([token("a", "color", "1"), token("b", "color", "2")]);
        let next = record_map([token("a", "color", "1"), token("b", "color", "3")]);
        let diff = full(&prev, &next);

        let mut scope = SummaryScope::new();
        scope.previous.insert("b".into());
        scope.next.insert("b".into());
        let s = summarize(
            &prev,
            &next,
            ChangeLists::from_result(&diff),
            Some(&scope),
            &DefaultSummaryStrategy,
        );
        assert_eq!(s.counts.total_previous, 1);
        assert_eq!(s.counts.total_next, 1);
        assert_eq!(s.counts.unchanged, 0);
        assert_eq!(s.counts.changed, 1);
    }

    #[test]
    fn custom_strategy_controls_bump() {
        struct NeverMajor;
        impl SummaryStrategy for NeverMajor {
            fn type_label(&self, s: &RecordSnapshot) -> String {
                DefaultSummaryStrategy.type_label(s)
            }
            fn group_labels(&self, s: &RecordSnapshot) -> Vec<String> {
                DefaultSummaryStrategy.group_labels(s)
            }
            fn recommend_bump(&self, changes: &ChangeLists<'_>) -> VersionBump {
                if changes.is_empty() {
                    VersionBump::None
                } else {
                    VersionBump::Minor
                }
            }
        }

        let prev = record_map([token("a", "color", "1")]);
        let diff = full(&prev, &RecordMap::new());
        assert_eq!(diff.removed[0].impact, Impact::Breaking);
        let s = summarize(
            &prev,
            &RecordMap::new(),
            ChangeLists::from_result(&diff),
            None,
            &NeverMajor,
        );
        assert_eq!(s.recommended_bump, VersionBump::Minor);
    }
}
