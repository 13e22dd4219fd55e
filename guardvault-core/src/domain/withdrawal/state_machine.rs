use crate::domain::withdrawal::results::StateTransitionResult;
use crate::domain::{PendingWithdrawalRequest, WithdrawalStatus};
use crate::foundation::GuardError;
use log::{info, warn};

const VALID_TRANSITIONS: &[(WithdrawalStatus, WithdrawalStatus)] = &[
    (WithdrawalStatus::Pending, WithdrawalStatus::Approved),
    (WithdrawalStatus::Pending, WithdrawalStatus::Rejected),
    (WithdrawalStatus::Pending, WithdrawalStatus::Deleted),
    (WithdrawalStatus::Approved, WithdrawalStatus::Executed),
    (WithdrawalStatus::Approved, WithdrawalStatus::Rejected),
];

pub fn validate_transition(from: WithdrawalStatus, to: WithdrawalStatus) -> StateTransitionResult {
    let valid = VALID_TRANSITIONS.contains(&(from, to));
    StateTransitionResult {
        valid,
        from_state: from.to_string(),
        to_state: to.to_string(),
        transition_reason: if valid { None } else { Some("not_allowed".to_string()) },
    }
}

pub fn is_terminal(status: WithdrawalStatus) -> bool {
    matches!(status, WithdrawalStatus::Executed | WithdrawalStatus::Rejected | WithdrawalStatus::Deleted)
}

pub fn ensure_valid_transition(from: WithdrawalStatus, to: WithdrawalStatus) -> Result<(), GuardError> {
    let transition = validate_transition(from, to);
    if transition.valid {
        Ok(())
    } else {
        Err(GuardError::InvalidTransition { from: transition.from_state, to: transition.to_state })
    }
}

/// Moves `request` to `next`, leaving it untouched when the edge is not allowed.
pub fn transition(request: &mut PendingWithdrawalRequest, next: WithdrawalStatus) -> Result<(), GuardError> {
    let from = request.status;
    if let Err(err) = ensure_valid_transition(from, next) {
        warn!(
            "invalid request state transition request_id={} vault={} from_state={} to_state={} error={}",
            request.id, request.vault, from, next, err
        );
        return Err(err);
    }
    request.status = next;
    info!(
        "request state transition request_id={} vault={} from_state={} to_state={} signatures={} quorum={}",
        request.id,
        request.vault,
        from,
        next,
        request.signature_count(),
        request.quorum
    );
    Ok(())
}
