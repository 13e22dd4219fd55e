use crate::foundation::util::decimal;
use crate::foundation::{Address, Bytes, RequestId, TimestampNanos, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The immutable body of a withdrawal: what guardians actually sign over.
///
/// Identity within a vault is the nonce; two requests with the same vault and
/// nonce describe the same withdrawal slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    /// ERC-20 token contract being withdrawn.
    pub token: Address,
    /// Raw token units, exact.
    #[serde(with = "decimal")]
    pub amount: U256,
    pub recipient: Address,
    #[serde(with = "decimal")]
    pub nonce: U256,
    #[serde(default)]
    pub reason: String,
}

/// One guardian's attestation over a [`WithdrawalRequest`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedWithdrawal {
    pub request: WithdrawalRequest,
    /// 65-byte recoverable ECDSA signature (`r || s || v`).
    pub signature: Bytes,
    pub signer: Address,
    /// Set by the coordinator when the signature is accepted; any client value is overwritten.
    #[serde(default)]
    pub signed_at_nanos: TimestampNanos,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    Pending,
    Approved,
    Executed,
    Rejected,
    Deleted,
}

impl WithdrawalStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Executed => "executed",
            Self::Rejected => "rejected",
            Self::Deleted => "deleted",
        }
    }

    /// Pending or approved: still accepting signatures.
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }

    /// Whether a request in this status keeps its `(vault, nonce)` slot. An executed
    /// withdrawal has spent the nonce for good; rejected and deleted ones free it.
    pub const fn holds_nonce(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved | Self::Executed)
    }
}

impl fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate root tracked by the coordinator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingWithdrawalRequest {
    pub id: RequestId,
    pub vault: Address,
    pub request: WithdrawalRequest,
    /// Insertion order is signing order.
    pub signatures: Vec<SignedWithdrawal>,
    pub quorum: u32,
    pub created_at_nanos: TimestampNanos,
    pub creator: Address,
    pub status: WithdrawalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_at_nanos: Option<TimestampNanos>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_tx_hash: Option<B256>,
}

impl PendingWithdrawalRequest {
    pub fn new(id: RequestId, vault: Address, request: WithdrawalRequest, quorum: u32, creator: Address, now: TimestampNanos) -> Self {
        Self {
            id,
            vault,
            request,
            signatures: Vec::new(),
            quorum,
            created_at_nanos: now,
            creator,
            status: WithdrawalStatus::Pending,
            executed_at_nanos: None,
            execution_tx_hash: None,
        }
    }

    pub fn signature_by(&self, signer: &Address) -> Option<&SignedWithdrawal> {
        self.signatures.iter().find(|sig| &sig.signer == signer)
    }

    pub fn signers(&self) -> impl Iterator<Item = &Address> {
        self.signatures.iter().map(|sig| &sig.signer)
    }

    pub fn signature_count(&self) -> usize {
        self.signatures.len()
    }
}
