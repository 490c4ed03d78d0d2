//! Aggregated diff summaries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::change::{ChangeRef, Impact};
use crate::error::TypeError;

/// Semantic-versioning style recommendation derived from a diff.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum VersionBump {
    #[default]
    None,
    Patch,
    Minor,
    Major,
}

impl VersionBump {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersionBump {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "patch" => Ok(Self::Patch),
            "minor" => Ok(Self::Minor),
            "major" => Ok(Self::Major),
            _ => Err(TypeError::UnknownVersionBump(s.to_string())),
        }
    }
}

/// Counter block shared by the global summary and every bucket.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeCounts {
    pub total_previous: usize,
    pub total_next: usize,
    pub added: usize,
    pub removed: usize,
    pub renamed: usize,
    pub changed: usize,
    pub unchanged: usize,
    pub breaking: usize,
    pub non_breaking: usize,
    pub value_changed: usize,
    pub metadata_changed: usize,
}

impl ChangeCounts {
    /// `added + removed + renamed + changed`.
    pub fn total_changes(&self) -> usize {
        self.added + self.removed + self.renamed + self.changed
    }

    /// Count one change: its kind, its impact, and for modifications
    /// whether it touched the value or only metadata.
    pub fn record(&mut self, change: ChangeRef<'_>) {
        match change {
            ChangeRef::Added(_) => self.added += 1,
            ChangeRef::Removed(_) => self.removed += 1,
            ChangeRef::Renamed(_) => self.renamed += 1,
            ChangeRef::Changed(m) => {
                self.changed += 1;
                if m.is_value_change() {
                    self.value_changed += 1;
                } else {
                    self.metadata_changed += 1;
                }
            }
        }
        match change.impact() {
            Impact::Breaking => self.breaking += 1,
            Impact::NonBreaking => self.non_breaking += 1,
        }
    }
}

/// Counts restricted to one bucket of a dimension (a type or a group).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionSummary {
    pub label: String,
    #[serde(flatten)]
    pub counts: ChangeCounts,
}

impl DimensionSummary {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            counts: ChangeCounts::default(),
        }
    }
}

/// Hierarchical summary of a diff.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummary {
    #[serde(flatten)]
    pub counts: ChangeCounts,
    pub recommended_bump: VersionBump,
    /// Per-type buckets, sorted by label.
    #[serde(default)]
    pub types: Vec<DimensionSummary>,
    /// Per-group buckets, sorted by label.
    #[serde(default)]
    pub groups: Vec<DimensionSummary>,
}

impl DiffSummary {
    pub fn total_changes(&self) -> usize {
        self.counts.total_changes()
    }

    /// Look up a type bucket by its label.
    pub fn type_bucket(&self, label: &str) -> Option<&DimensionSummary> {
        self.types.iter().find(|b| b.label == label)
    }

    /// Look up a group bucket by its label.
    pub fn group_bucket(&self, label: &str) -> Option<&DimensionSummary> {
        self.groups.iter().find(|b| b.label == label)
    }
}
