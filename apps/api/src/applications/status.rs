//! Status transition rules for the application lifecycle.
//!
//! `pending -> evaluated -> {accepted, rejected}`. The two terminal states
//! may be overridden into each other by an operator, in both directions. A
//! record must carry an evaluation write before any terminal decision, so
//! `pending -> accepted/rejected` is never legal.

use crate::models::application::ApplicationStatus;

impl ApplicationStatus {
    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        matches!(
            (self, next),
            (Pending, Evaluated)
                | (Evaluated, Accepted)
                | (Evaluated, Rejected)
                | (Accepted, Rejected)
                | (Rejected, Accepted)
        )
    }

    /// States from which an evaluation write is accepted. A terminal decision
    /// is never reopened by a late evaluator callback.
    pub fn accepts_evaluation(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Pending | ApplicationStatus::Evaluated
        )
    }

    /// All states allowed to move into `next`. Drives the repositories'
    /// single-statement check-then-write.
    pub fn legal_sources(next: ApplicationStatus) -> Vec<ApplicationStatus> {
        use ApplicationStatus::*;
        [Pending, Evaluated, Accepted, Rejected]
            .into_iter()
            .filter(|s| s.can_transition_to(next))
            .collect()
    }
}
