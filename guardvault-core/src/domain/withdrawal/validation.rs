use crate::domain::WithdrawalRequest;
use crate::foundation::{GuardError, MAX_QUORUM, MAX_REASON_LENGTH};

/// Structural checks run before a request is accepted for signing.
pub fn validate_new_request(request: &WithdrawalRequest, quorum: u32) -> Result<(), GuardError> {
    if request.amount.is_zero() {
        return Err(GuardError::InvalidRequest("amount must be greater than zero".to_string()));
    }
    if request.recipient.is_zero() {
        return Err(GuardError::InvalidRequest("recipient must not be the zero address".to_string()));
    }
    if quorum < 1 {
        return Err(GuardError::InvalidRequest("quorum must be at least 1".to_string()));
    }
    if quorum > MAX_QUORUM {
        return Err(GuardError::InvalidRequest(format!("quorum {} exceeds maximum {}", quorum, MAX_QUORUM)));
    }
    if request.reason.len() > MAX_REASON_LENGTH {
        return Err(GuardError::InvalidRequest(format!(
            "reason is {} bytes, maximum is {}",
            request.reason.len(),
            MAX_REASON_LENGTH
        )));
    }
    Ok(())
}
