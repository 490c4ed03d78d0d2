use serde::{Deserialize, Serialize};

use crate::rename::StructuralRenameStrategyOptions;

/// Configuration for a [`crate::DiffEngine`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiffOptions {
    /// Pair removals with structurally equivalent additions.
    pub detect_renames: bool,
    /// Fields the default structural rename strategy compares.
    pub rename: StructuralRenameStrategyOptions,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            detect_renames: true,
            rename: StructuralRenameStrategyOptions::default(),
        }
    }
}

impl DiffOptions {
    /// Report every identity change as a plain removal plus addition.
    pub fn without_renames() -> Self {
        Self {
            detect_renames: false,
            ..Default::default()
        }
    }
}
