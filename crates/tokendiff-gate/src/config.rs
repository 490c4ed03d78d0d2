use serde::{Deserialize, Serialize};

use crate::error::GateError;

/// Which diff outcomes fail a build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FailurePolicy {
    /// Fail when any change is classified as breaking.
    pub fail_on_breaking: bool,
    /// Fail when there is any change at all.
    pub fail_on_changes: bool,
}

impl FailurePolicy {
    /// Never fail.
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Fail on breaking changes only.
    pub fn breaking_only() -> Self {
        Self {
            fail_on_breaking: true,
            fail_on_changes: false,
        }
    }

    /// Fail on any change.
    pub fn strict() -> Self {
        Self {
            fail_on_breaking: true,
            fail_on_changes: true,
        }
    }

    /// Parse a policy from TOML, e.g. a `[diff.failure]` table's contents.
    ///
    /// Missing keys default to `false`.
    pub fn from_toml_str(s: &str) -> Result<Self, GateError> {
        toml::from_str(s).map_err(|e| GateError::Config(e.to_string()))
    }
}
