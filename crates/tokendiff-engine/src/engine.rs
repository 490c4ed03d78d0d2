use tracing::debug;

use tokendiff_types::{DiffFilter, DiffResult, RecordSource};

use crate::collect::collect_changes;
use crate::config::DiffOptions;
use crate::error::DiffOutcome;
use crate::filter::filter_diff_with;
use crate::impact::{default_impact_strategy, ImpactStrategy};
use crate::rename::{detect_renames, structural_rename_strategy, RenameOutcome, RenameStrategy};
use crate::summary::{default_summary_strategy, summarize, ChangeLists, SummaryStrategy};

/// The diff engine: change collection, rename detection and summary
/// aggregation behind injectable strategies.
///
/// An engine holds no state between invocations; one instance can diff any
/// number of collection pairs, from any number of threads.
pub struct DiffEngine {
    impact: Box<dyn ImpactStrategy>,
    rename: Box<dyn RenameStrategy>,
    summary: Box<dyn SummaryStrategy>,
    options: DiffOptions,
}

impl DiffEngine {
    /// Create an engine with the default strategies and options.
    pub fn new() -> Self {
        Self::with_options(DiffOptions::default())
    }

    /// Create an engine with default strategies configured by `options`.
    pub fn with_options(options: DiffOptions) -> Self {
        Self {
            impact: default_impact_strategy(),
            rename: structural_rename_strategy(options.rename.clone()),
            summary: default_summary_strategy(),
            options,
        }
    }

    /// Replace the impact classifier.
    pub fn with_impact_strategy(mut self, strategy: Box<dyn ImpactStrategy>) -> Self {
        self.impact = strategy;
        self
    }

    /// Replace the rename match predicate.
    pub fn with_rename_strategy(mut self, strategy: Box<dyn RenameStrategy>) -> Self {
        self.rename = strategy;
        self
    }

    /// Replace the summary bucketing and bump policy.
    pub fn with_summary_strategy(mut self, strategy: Box<dyn SummaryStrategy>) -> Self {
        self.summary = strategy;
        self
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Compare two collections.
    pub fn diff<P, N>(&self, previous: P, next: N) -> DiffResult
    where
        P: RecordSource,
        N: RecordSource,
    {
        let previous = previous.records();
        let next = next.records();

        let raw = collect_changes(previous, next, self.impact.as_ref());
        let RenameOutcome {
            renamed,
            removed,
            added,
        } = if self.options.detect_renames {
            detect_renames(raw.removed, raw.added, self.rename.as_ref(), self.impact.as_ref())
        } else {
            RenameOutcome {
                renamed: Vec::new(),
                removed: raw.removed,
                added: raw.added,
            }
        };

        let mut diff = DiffResult {
            added,
            removed,
            changed: raw.changed,
            renamed,
            summary: Default::default(),
        };
        diff.summary = summarize(
            previous,
            next,
            ChangeLists::from_result(&diff),
            None,
            self.summary.as_ref(),
        );

        debug!(
            changes = diff.total_changes(),
            breaking = diff.summary.counts.breaking,
            bump = %diff.summary.recommended_bump,
            "diff computed"
        );
        diff
    }

    /// Re-scope an existing diff of `previous` and `next`.
    pub fn filter<P, N>(
        &self,
        diff: &DiffResult,
        previous: P,
        next: N,
        filter: &DiffFilter,
    ) -> DiffOutcome<DiffResult>
    where
        P: RecordSource,
        N: RecordSource,
    {
        filter_diff_with(diff, previous, next, filter, self.summary.as_ref())
    }
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Diff two collections with the default engine.
pub fn diff_token_sets<P, N>(previous: P, next: N) -> DiffResult
where
    P: RecordSource,
    N: RecordSource,
{
    DiffEngine::new().diff(previous, next)
}

/// Filter a diff with the default summary strategy.
pub fn filter_diff<P, N>(
    diff: &DiffResult,
    previous: P,
    next: N,
    filter: &DiffFilter,
) -> DiffOutcome<DiffResult>
where
    P: RecordSource,
    N: RecordSource,
{
    DiffEngine::new().filter(diff, previous, next, filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impact::DefaultImpactStrategy;
    use serde_json::json;
    use tokendiff_types::{
        record_map, FieldChange, Impact, RecordMap, RecordSnapshot, TokenSet, VersionBump,
    };

    fn token(id: &str, value: &str) -> RecordSnapshot {
        RecordSnapshot::from_dotted(id)
            .with_type("color")
            .with_value(json!(value))
    }

    #[test]
    fn accepts_maps_and_token_sets() {
        let prev: TokenSet = [token("a", "#fff")].into_iter().collect();
        let next = record_map([token("a", "#000")]);
        let diff = DiffEngine::new().diff(&prev, &next);
        assert_eq!(diff.changed.len(), 1);
    }

    #[test]
    fn renames_can_be_disabled() {
        let prev = record_map([token("a", "#fff")]);
        let next = record_map([token("b", "#fff")]);

        let diff = DiffEngine::with_options(DiffOptions::without_renames()).diff(&prev, &next);
        assert!(diff.renamed.is_empty());
        assert_eq!(diff.added.len(), 1);
        assert_eq!(diff.removed.len(), 1);
    }

    #[test]
    fn custom_rename_strategy() {
        let prev = record_map([token("a.leaf", "#fff")]);
        let next = record_map([token("b.leaf", "#000")]);

        let engine = DiffEngine::new().with_rename_strategy(Box::new(
            |p: &RecordSnapshot, n: &RecordSnapshot| p.path.last() == n.path.last(),
        ));
        let diff = engine.diff(&prev, &next);
        assert_eq!(diff.renamed.len(), 1);
        assert_eq!(diff.summary.counts.renamed, 1);
    }

    #[test]
    fn custom_impact_strategy_drives_bump() {
        struct EverythingBreaks;
        impl ImpactStrategy for EverythingBreaks {
            fn classify_addition(&self, _: &RecordSnapshot) -> Impact {
                Impact::Breaking
            }
            fn classify_removal(&self, p: &RecordSnapshot) -> Impact {
                DefaultImpactStrategy.classify_removal(p)
            }
            fn classify_rename(&self, p: &RecordSnapshot, n: &RecordSnapshot) -> Impact {
                DefaultImpactStrategy.classify_rename(p, n)
            }
            fn classify_modification(
                &self,
                _: &RecordSnapshot,
                _: &RecordSnapshot,
                _: &[FieldChange],
            ) -> Impact {
                Impact::Breaking
            }
        }

        let prev = record_map([token("a", "#fff")]);
        let next = record_map([token("a", "#000")]);
        let engine = DiffEngine::new().with_impact_strategy(Box::new(EverythingBreaks));
        let diff = engine.diff(&prev, &next);
        assert_eq!(diff.changed[0].impact, Impact::Breaking);
        assert_eq!(diff.summary.recommended_bump, VersionBump::Major);
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        let engine = std::sync::Arc::new(DiffEngine::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let engine = engine.clone();
                std::thread::spawn(move || {
                    let prev = record_map([token("a", "#fff")]);
                    let next = record_map([token("a", &format!("#{i}{i}{i}"))]);
                    engine.diff(&prev, &next).total_changes()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
    }

    #[test]
    fn empty_collections() {
        let diff = diff_token_sets(&RecordMap::new(), &RecordMap::new());
        assert!(diff.is_empty());
        assert_eq!(diff.summary.recommended_bump, VersionBump::None);
    }
}
