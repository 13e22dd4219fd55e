//! Canonical signing payload for a withdrawal request.
//!
//! Layout (all integers big-endian):
//!
//! ```text
//! tag("guardvault:withdrawal:v1:") || vault(20) || token(20) || amount(32)
//!   || recipient(20) || nonce(32) || len(reason)(4) || utf8(reason)
//! ```

use crate::domain::WithdrawalRequest;
use crate::foundation::{Address, B256, CANONICAL_DOMAIN_TAG};
use alloy_primitives::keccak256;

const FIXED_LEN: usize = 20 + 20 + 32 + 20 + 32 + 4;

pub fn canonical_payload(vault: &Address, request: &WithdrawalRequest) -> Vec<u8> {
    let reason = request.reason.as_bytes();
    let mut out = Vec::with_capacity(CANONICAL_DOMAIN_TAG.len() + FIXED_LEN + reason.len());
    out.extend_from_slice(CANONICAL_DOMAIN_TAG);
    out.extend_from_slice(vault.as_slice());
    out.extend_from_slice(request.token.as_slice());
    out.extend_from_slice(&request.amount.to_be_bytes::<32>());
    out.extend_from_slice(request.recipient.as_slice());
    out.extend_from_slice(&request.nonce.to_be_bytes::<32>());
    // Reason length is bounded well below u32::MAX by request validation.
    out.extend_from_slice(&(reason.len() as u32).to_be_bytes());
    out.extend_from_slice(reason);
    out
}

/// keccak-256 of the canonical payload; used as a stable request fingerprint in logs.
pub fn payload_hash(vault: &Address, request: &WithdrawalRequest) -> B256 {
    keccak256(canonical_payload(vault, request))
}
