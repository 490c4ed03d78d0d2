use serde::{Deserialize, Serialize};
use tokendiff_types::DiffSummary;
use tracing::debug;

use crate::check::{CheckDecision, FailureCheck, FailureReason};
use crate::checks::{BreakingChangesCheck, TokenChangesCheck};
use crate::config::FailurePolicy;

// ---------------------------------------------------------------------------
// FailureResult
// ---------------------------------------------------------------------------

/// The verdict of running a diff summary through the failure gate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureResult {
    pub should_fail: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
    /// How many changes triggered the failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_count: Option<usize>,
}

impl FailureResult {
    /// A passing verdict with no reason.
    pub fn passed() -> Self {
        Self::default()
    }

    pub fn failed(reason: FailureReason, matched_count: usize) -> Self {
        Self {
            should_fail: true,
            reason: Some(reason),
            matched_count: Some(matched_count),
        }
    }

    /// One-line explanation suitable for terminal output.
    pub fn message(&self) -> String {
        if !self.should_fail {
            return "no failing changes".to_string();
        }
        let count = self.matched_count.unwrap_or(0);
        match &self.reason {
            Some(FailureReason::BreakingChanges) => {
                format!("{count} breaking {} detected", plural(count))
            }
            Some(FailureReason::TokenChanges) => {
                format!("{count} token {} detected", plural(count))
            }
            Some(FailureReason::Custom(reason)) => format!("{reason}: {count} matched"),
            None => "failed".to_string(),
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        "change"
    } else {
        "changes"
    }
}

// ---------------------------------------------------------------------------
// FailureGate
// ---------------------------------------------------------------------------

/// An ordered pipeline of checks that decides whether a diff fails a build.
pub struct FailureGate {
    checks: Vec<Box<dyn FailureCheck>>,
    policy: FailurePolicy,
}

impl FailureGate {
    /// Create a gate with no checks. Use [`Self::add_check`] to add checks,
    /// or [`Self::with_default_checks`] for the standard pipeline.
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            checks: Vec::new(),
            policy,
        }
    }

    /// Create a gate with the default pipeline:
    /// BreakingChanges -> TokenChanges
    pub fn with_default_checks(policy: FailurePolicy) -> Self {
        let mut gate = Self::new(policy);
        gate.add_check(Box::new(BreakingChangesCheck));
        gate.add_check(Box::new(TokenChangesCheck));
        gate
    }

    /// Append a check to the end of the pipeline.
    pub fn add_check(&mut self, check: Box<dyn FailureCheck>) {
        self.checks.push(check);
    }

    pub fn policy(&self) -> &FailurePolicy {
        &self.policy
    }

    pub fn check_count(&self) -> usize {
        self.checks.len()
    }

    /// Evaluate a summary through the pipeline.
    ///
    /// The pipeline is **fail-fast**: the first check that fails decides the
    /// verdict. If every check passes the result is [`FailureResult::passed`].
    pub fn evaluate(&self, summary: &DiffSummary) -> FailureResult {
        for check in &self.checks {
            match check.evaluate(summary, &self.policy) {
                CheckDecision::Pass => {}
                CheckDecision::Fail {
                    reason,
                    matched_count,
                } => {
                    debug!(
                        check = check.name(),
                        reason = %reason,
                        matched_count,
                        "failure gate tripped"
                    );
                    return FailureResult::failed(reason, matched_count);
                }
            }
        }
        debug!(checks = self.checks.len(), "failure gate passed");
        FailureResult::passed()
    }
}

/// Evaluate a summary against a policy with the default checks.
pub fn evaluate_failure(summary: &DiffSummary, policy: &FailurePolicy) -> FailureResult {
    FailureGate::with_default_checks(*policy).evaluate(summary)
}
