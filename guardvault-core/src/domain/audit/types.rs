use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEvent {
    RequestCreated {
        request_id: String,
        vault: String,
        creator: String,
        nonce: String,
        amount: String,
        quorum: u32,
        payload_hash: String,
        timestamp_ns: u64,
    },
    SignatureAccepted {
        request_id: String,
        signer: String,
        signature_count: usize,
        quorum: u32,
        timestamp_ns: u64,
    },
    SignatureRejected {
        request_id: String,
        signer: String,
        reason: String,
        timestamp_ns: u64,
    },
    QuorumReached {
        request_id: String,
        vault: String,
        valid_signers: u32,
        quorum: u32,
        timestamp_ns: u64,
    },
    WithdrawalExecuted {
        request_id: String,
        vault: String,
        tx_hash: String,
        timestamp_ns: u64,
    },
    RequestRejected {
        request_id: String,
        actor: String,
        previous_status: String,
        timestamp_ns: u64,
    },
    RequestDeleted {
        request_id: String,
        actor: String,
        timestamp_ns: u64,
    },
    GuardianChanged {
        vault: String,
        guardian: String,
        action: GuardianAction,
        timestamp_ns: u64,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GuardianAction {
    Granted,
    Revoked,
}
