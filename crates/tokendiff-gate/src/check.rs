use std::fmt;

use serde::{Deserialize, Serialize};
use tokendiff_types::DiffSummary;

use crate::config::FailurePolicy;

// ---------------------------------------------------------------------------
// FailureReason
// ---------------------------------------------------------------------------

/// Why a gate failed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FailureReason {
    /// At least one change is breaking (`breaking-changes`).
    BreakingChanges,
    /// At least one change exists (`token-changes`).
    TokenChanges,
    /// Reported by a check added on top of the built-ins.
    Custom(String),
}

impl FailureReason {
    pub fn as_str(&self) -> &str {
        match self {
            Self::BreakingChanges => "breaking-changes",
            Self::TokenChanges => "token-changes",
            Self::Custom(reason) => reason,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for FailureReason {
    fn from(s: String) -> Self {
        match s.as_str() {
            "breaking-changes" => Self::BreakingChanges,
            "token-changes" => Self::TokenChanges,
            _ => Self::Custom(s),
        }
    }
}

impl From<FailureReason> for String {
    fn from(reason: FailureReason) -> Self {
        match reason {
            FailureReason::Custom(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// CheckDecision
// ---------------------------------------------------------------------------

/// The outcome of a single failure check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckDecision {
    /// Nothing to report; proceed to the next check.
    Pass,
    /// The build should fail.
    Fail {
        reason: FailureReason,
        matched_count: usize,
    },
}

impl CheckDecision {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }
}

// ---------------------------------------------------------------------------
// FailureCheck trait
// ---------------------------------------------------------------------------

/// A single check in the failure gate.
///
/// Checks run in order and the first failure wins. The trait is object-safe
/// and `Send + Sync` so checks can be stored in a `Vec<Box<dyn FailureCheck>>`.
pub trait FailureCheck: Send + Sync {
    /// Human-readable name (e.g. "breaking-changes").
    fn name(&self) -> &str;

    fn evaluate(&self, summary: &DiffSummary, policy: &FailurePolicy) -> CheckDecision;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_wire_names() {
        assert_eq!(
            serde_json::to_string(&FailureReason::BreakingChanges).unwrap(),
            "\"breaking-changes\""
        );
        let parsed: FailureReason = serde_json::from_str("\"token-changes\"").unwrap();
        assert_eq!(parsed, FailureReason::TokenChanges);
        let custom: FailureReason = serde_json::from_str("\"deprecations\"").unwrap();
        assert_eq!(custom, FailureReason::Custom("deprecations".into()));
    }

    #[test]
    fn decision_predicates() {
        assert!(CheckDecision::Pass.is_pass());
        let fail = CheckDecision::Fail {
            reason: FailureReason::TokenChanges,
            matched_count: 1,
        };
        assert!(fail.is_fail());
        assert!(!fail.is_pass());
    }
}
