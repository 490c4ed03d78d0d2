use tokendiff_types::DiffSummary;

use crate::check::{CheckDecision, FailureCheck, FailureReason};
use crate::config::FailurePolicy;

/// Fails when the policy asks for it and the summary has breaking changes.
pub struct BreakingChangesCheck;

impl FailureCheck for BreakingChangesCheck {
    fn name(&self) -> &str {
        "breaking-changes"
    }

    fn evaluate(&self, summary: &DiffSummary, policy: &FailurePolicy) -> CheckDecision {
        let breaking = summary.counts.breaking;
        if policy.fail_on_breaking && breaking > 0 {
            CheckDecision::Fail {
                reason: FailureReason::BreakingChanges,
                matched_count: breaking,
            }
        } else {
            CheckDecision::Pass
        }
    }
}
