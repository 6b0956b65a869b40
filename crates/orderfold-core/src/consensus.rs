//! Consensus Resolver: one status out of a set of per-line approvals.
//!
//! Priority: every line approved → Approved; otherwise any rejection vetoes
//! the order → Rejected; otherwise Pending.

use crate::data_model::ApprovalState;

/// Vote over a set of approvals. Order of the input never matters.
///
/// An empty set is Pending; aggregation never produces one.
pub fn resolve<'a, I>(confirmations: I) -> ApprovalState
where
    I: IntoIterator<Item = &'a ApprovalState>,
{
    let mut seen_any = false;
    let mut all_approved = true;
    let mut any_rejected = false;

    for state in confirmations {
        seen_any = true;
        match state {
            ApprovalState::Approved => {}
            ApprovalState::Rejected => {
                all_approved = false;
                any_rejected = true;
            }
            ApprovalState::Pending => all_approved = false,
        }
    }

    if seen_any && all_approved {
        ApprovalState::Approved
    } else if any_rejected {
        ApprovalState::Rejected
    } else {
        ApprovalState::Pending
    }
}
