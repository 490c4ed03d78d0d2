//! Failure gate for tokendiff.
//!
//! Turns a [`DiffSummary`](tokendiff_types::DiffSummary) into a pass/fail
//! verdict for CI. The gate runs an ordered pipeline of checks (breaking
//! changes first, then any change) and stops at the first failure.
//!
//! # Quick Start
//!
//! ```rust
//! use tokendiff_gate::{evaluate_failure, FailurePolicy, FailureReason};
//! use tokendiff_types::DiffSummary;
//!
//! let mut summary = DiffSummary::default();
//! summary.counts.breaking = 2;
//!
//! let result = evaluate_failure(&summary, &FailurePolicy::breaking_only());
//! assert!(result.should_fail);
//! assert_eq!(result.reason, Some(FailureReason::BreakingChanges));
//! assert_eq!(result.matched_count, Some(2));
//! ```

pub mod check;
pub mod checks;
pub mod config;
pub mod error;
pub mod gate;

// Re-exports for convenience.
pub use check::{CheckDecision, FailureCheck, FailureReason};
pub use checks::{BreakingChangesCheck, TokenChangesCheck};
pub use config::FailurePolicy;
pub use error::GateError;
pub use gate::{evaluate_failure, FailureGate, FailureResult};
