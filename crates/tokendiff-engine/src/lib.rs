//! Structural diff engine for tokendiff.
//!
//! Compares a *previous* and a *next* collection of record snapshots,
//! producing additions, removals, modifications and renames, each
//! classified by compatibility impact, and aggregates them into global,
//! per-type and per-group summaries. An existing diff can be re-scoped under
//! filter criteria without recomputing it.
//!
//! The pipeline is pure and synchronous:
//!
//! 1. [`collect_changes`] walks both collections once
//! 2. [`detect_renames`] greedily pairs removals with additions
//! 3. [`summarize`] folds the change lists into a [`DiffSummary`]
//!
//! [`DiffEngine`] runs the pipeline behind three injectable strategies:
//! [`ImpactStrategy`], [`RenameStrategy`] and [`SummaryStrategy`].
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use tokendiff_engine::diff_token_sets;
//! use tokendiff_types::{record_map, RecordSnapshot};
//!
//! let previous = record_map([RecordSnapshot::from_dotted("color.bg")
//!     .with_type("color")
//!     .with_value(json!("#fff"))]);
//! let next = record_map([RecordSnapshot::from_dotted("color.bg")
//!     .with_type("color")
//!     .with_value(json!("#000"))]);
//!
//! let diff = diff_token_sets(&previous, &next);
//! assert_eq!(diff.changed.len(), 1);
//! assert_eq!(diff.summary.counts.value_changed, 1);
//! ```
//!
//! [`DiffSummary`]: tokendiff_types::DiffSummary

pub mod collect;
pub mod compare;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod impact;
pub mod rename;
pub mod summary;

pub use collect::{collect_changes, CollectedChanges};
pub use compare::diff_fields;
pub use config::DiffOptions;
pub use engine::{diff_token_sets, filter_diff, DiffEngine};
pub use error::{DiffError, DiffOutcome};
pub use filter::{filter_diff_with, NormalizedFilter};
pub use impact::{default_impact_strategy, DefaultImpactStrategy, ImpactStrategy};
pub use rename::{
    default_rename_strategy, detect_renames, structural_rename_strategy, RenameOutcome,
    RenameStrategy, StructuralRenameStrategy, StructuralRenameStrategyOptions,
};
pub use summary::{
    default_summary_strategy, summarize, ChangeLists, DefaultSummaryStrategy, SummaryScope,
    SummaryStrategy,
};
