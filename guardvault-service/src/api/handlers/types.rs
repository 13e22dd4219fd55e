use guardvault_core::foundation::{ErrorCode, GuardError};
use serde::{Deserialize, Serialize};

/// JSON-RPC error codes. Application codes live in the implementation-defined
/// `-32000..-32099` range, one per coordinator error kind.
#[repr(i64)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RpcErrorCode {
    ParseError = -32700,
    InvalidRequest = -32600,
    MethodNotFound = -32601,
    InvalidParams = -32602,
    InternalError = -32603,
    Unauthorized = -32001,
    RequestInvalid = -32010,
    DuplicateNonce = -32011,
    NotFound = -32012,
    RequestClosed = -32013,
    InvalidSignature = -32014,
    NotAGuardian = -32015,
    DuplicateSigner = -32016,
    QuorumNotMet = -32017,
    InvalidTransition = -32018,
    DependencyUnavailable = -32019,
}

impl RpcErrorCode {
    pub fn for_error(err: &GuardError) -> Self {
        match err.code() {
            ErrorCode::InvalidRequest => Self::RequestInvalid,
            ErrorCode::DuplicateNonce => Self::DuplicateNonce,
            ErrorCode::NotFound => Self::NotFound,
            ErrorCode::RequestClosed => Self::RequestClosed,
            ErrorCode::InvalidSignature => Self::InvalidSignature,
            ErrorCode::NotAGuardian => Self::NotAGuardian,
            ErrorCode::DuplicateSigner => Self::DuplicateSigner,
            ErrorCode::QuorumNotMet => Self::QuorumNotMet,
            ErrorCode::InvalidTransition => Self::InvalidTransition,
            ErrorCode::DependencyUnavailable => Self::DependencyUnavailable,
            ErrorCode::StorageError
            | ErrorCode::SerializationError
            | ErrorCode::ConfigError
            | ErrorCode::EncodingError
            | ErrorCode::Message => Self::InternalError,
        }
    }

    /// Label used for the `status` dimension of `rpc_requests_total`.
    pub const fn label(self) -> &'static str {
        match self {
            Self::ParseError => "parse_error",
            Self::InvalidRequest => "invalid_request",
            Self::MethodNotFound => "not_found",
            Self::InvalidParams => "invalid_params",
            Self::InternalError => "internal_error",
            Self::Unauthorized => "unauthorized",
            Self::RequestInvalid => "request_invalid",
            Self::DuplicateNonce => "duplicate_nonce",
            Self::NotFound => "request_not_found",
            Self::RequestClosed => "request_closed",
            Self::InvalidSignature => "invalid_signature",
            Self::NotAGuardian => "not_a_guardian",
            Self::DuplicateSigner => "duplicate_signer",
            Self::QuorumNotMet => "quorum_not_met",
            Self::InvalidTransition => "invalid_transition",
            Self::DependencyUnavailable => "dependency_unavailable",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: serde_json::Value,
    pub method: String,
    pub params: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse<T> {
    pub jsonrpc: &'static str,
    pub id: serde_json::Value,
    pub result: T,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub jsonrpc: &'static str,
    pub id: serde_json::Value,
    pub error: JsonRpcErrorBody,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcErrorBody {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

pub fn json_ok<T: Serialize>(id: serde_json::Value, result: T) -> serde_json::Value {
    serde_json::to_value(JsonRpcResponse { jsonrpc: "2.0", id, result }).unwrap_or(serde_json::Value::Null)
}

pub fn json_err(id: serde_json::Value, code: RpcErrorCode, message: impl Into<String>) -> serde_json::Value {
    error_value(id, JsonRpcErrorBody { code: code as i64, message: message.into(), data: None })
}

/// Error response for a coordinator failure; `data.retryable` tells clients whether to back off and retry.
pub fn json_guard_err(id: serde_json::Value, err: &GuardError) -> serde_json::Value {
    let code = RpcErrorCode::for_error(err);
    let data = serde_json::json!({ "kind": code.label(), "retryable": err.is_retryable() });
    error_value(id, JsonRpcErrorBody { code: code as i64, message: err.to_string(), data: Some(data) })
}

fn error_value(id: serde_json::Value, error: JsonRpcErrorBody) -> serde_json::Value {
    serde_json::to_value(JsonRpcError { jsonrpc: "2.0", id, error }).unwrap_or(serde_json::Value::Null)
}
