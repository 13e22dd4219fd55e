use crate::foundation::util::time::now_nanos;
use crate::foundation::{ActivityId, Address, RequestId, TimestampNanos};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    CreateRequest,
    SignRequest,
    ExecuteWithdrawal,
    RejectRequest,
    DeleteRequest,
}

impl ActivityType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateRequest => "create_request",
            Self::SignRequest => "sign_request",
            Self::ExecuteWithdrawal => "execute_withdrawal",
            Self::RejectRequest => "reject_request",
            Self::DeleteRequest => "delete_request",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only per-account record of a coordinator mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccountActivity {
    pub id: ActivityId,
    pub account: Address,
    pub activity_type: ActivityType,
    #[serde(default)]
    pub details: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
    pub timestamp_nanos: TimestampNanos,
}

impl AccountActivity {
    pub fn new(account: Address, activity_type: ActivityType, details: serde_json::Value, request_id: Option<RequestId>) -> Self {
        Self { id: ActivityId::generate(), account, activity_type, details, request_id, timestamp_nanos: now_nanos() }
    }
}
