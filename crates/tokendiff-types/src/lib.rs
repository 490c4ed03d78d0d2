//! Foundation types for tokendiff.
//!
//! This crate holds the data model shared by the diff engine, the failure
//! gate, and any report renderer reading their output. It performs no
//! diffing of its own.
//!
//! # Key Types
//!
//! - [`RecordSnapshot`] — One resolved version of one record
//! - [`RecordMap`] / [`TokenSet`] / [`RecordSource`] — One side of a comparison
//! - [`Addition`] / [`Removal`] / [`Modification`] / [`Rename`] — Change records
//! - [`ChangeRef`] — Tagged view over any change record
//! - [`DiffResult`] — Change lists plus their [`DiffSummary`]
//! - [`DiffFilter`] — Criteria for re-scoping a diff

pub mod change;
pub mod collection;
pub mod error;
pub mod filter;
pub mod result;
pub mod snapshot;
pub mod summary;

pub use change::{
    Addition, ChangeKind, ChangeRef, FieldChange, Impact, Modification, Removal, Rename,
};
pub use collection::{record_map, RecordMap, RecordSource, TokenSet};
pub use error::TypeError;
pub use filter::DiffFilter;
pub use result::DiffResult;
pub use snapshot::{format_pointer, parse_pointer, Deprecation, Pointer, RecordSnapshot};
pub use summary::{ChangeCounts, DiffSummary, DimensionSummary, VersionBump};
