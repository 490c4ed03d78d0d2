//! Error types for the engine crate.

use tokendiff_types::TypeError;

/// Errors that can occur during diff operations.
///
/// Diffing itself cannot fail; only caller-supplied filter criteria are
/// validated.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiffError {
    /// A filter value could not be understood.
    #[error("invalid {field} filter '{token}': {reason}")]
    InvalidFilter {
        field: &'static str,
        token: String,
        reason: String,
    },
}

impl DiffError {
    pub(crate) fn invalid_filter(field: &'static str, token: &str, source: TypeError) -> Self {
        Self::InvalidFilter {
            field,
            token: token.to_string(),
            reason: source.to_string(),
        }
    }
}

/// Convenience alias for engine results.
pub type DiffOutcome<T> = Result<T, DiffError>;
