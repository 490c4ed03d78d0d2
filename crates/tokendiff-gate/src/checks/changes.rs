use tokendiff_types::DiffSummary;

use crate::check::{CheckDecision, FailureCheck, FailureReason};
use crate::config::FailurePolicy;

/// Fails when the policy asks for it and the summary has any change.
///
/// Counts additions, removals, renames and modifications.
pub struct TokenChangesCheck;

impl FailureCheck for TokenChangesCheck {
    fn name(&self) -> &str {
        "token-changes"
    }

    fn evaluate(&self, summary: &DiffSummary, policy: &FailurePolicy) -> CheckDecision {
        let total = summary.total_changes();
        if policy.fail_on_changes && total > 0 {
            CheckDecision::Fail {
                reason: FailureReason::TokenChanges,
                matched_count: total,
            }
        } else {
            CheckDecision::Pass
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_every_kind_of_change() {
        let mut s = DiffSummary::default();
        s.counts.added = 1;
        s.counts.removed = 2;
        s.counts.renamed = 3;
        s.counts.changed = 4;
        s.counts.unchanged = 100;

        let policy = FailurePolicy {
            fail_on_changes: true,
            ..Default::default()
        };
        assert_eq!(
            TokenChangesCheck.evaluate(&s, &policy),
            CheckDecision::Fail {
                reason: FailureReason::TokenChanges,
                matched_count: 10,
            }
        );
    }

    #[test]
    fn unchanged_records_do_not_count() {
        let mut s = DiffSummary::default();
        s.counts.unchanged = 5;
        assert!(TokenChangesCheck.evaluate(&s, &FailurePolicy::strict()).is_pass());
    }
}
