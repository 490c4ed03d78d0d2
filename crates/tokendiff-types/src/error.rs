use thiserror::Error;

/// Errors produced when parsing type-level tokens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown change kind '{0}' (expected added, removed, changed or renamed)")]
    UnknownChangeKind(String),

    #[error("unknown impact '{0}' (expected breaking or non-breaking)")]
    UnknownImpact(String),

    #[error("unknown field change '{0}'")]
    UnknownFieldChange(String),

    #[error("unknown version bump '{0}' (expected none, patch, minor or major)")]
    UnknownVersionBump(String),

    #[error("invalid pointer '{pointer}': {reason}")]
    InvalidPointer { pointer: String, reason: String },
}
