use std::io;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidRequest,
    DuplicateNonce,
    NotFound,
    RequestClosed,
    InvalidSignature,
    NotAGuardian,
    DuplicateSigner,
    QuorumNotMet,
    InvalidTransition,
    DependencyUnavailable,
    StorageError,
    SerializationError,
    ConfigError,
    EncodingError,
    Message,
}

#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum GuardError {
    // === Request validation ===
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("duplicate nonce {nonce} for vault {vault}: open request {existing_id}")]
    DuplicateNonce { vault: String, nonce: String, existing_id: String },

    #[error("withdrawal request not found: {0}")]
    NotFound(String),

    #[error("withdrawal request {request_id} is closed (status={status})")]
    RequestClosed { request_id: String, status: String },

    // === Signature collection ===
    #[error("invalid signature from {signer}: {reason}")]
    InvalidSignature { signer: String, reason: String },

    #[error("{signer} is not an active guardian of vault {vault}")]
    NotAGuardian { vault: String, signer: String },

    #[error("{signer} already signed request {request_id} with different signature bytes")]
    DuplicateSigner { request_id: String, signer: String },

    #[error("quorum not met: required {required}, have {count}")]
    QuorumNotMet { required: u32, count: u32 },

    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    // === Collaborators ===
    #[error("{dependency} unavailable: {details}")]
    DependencyUnavailable { dependency: String, details: String },

    // === Ambient ===
    #[error("storage error during {operation}: {details}")]
    StorageError { operation: String, details: String },

    #[error("serialization error ({format}): {details}")]
    SerializationError { format: String, details: String },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, GuardError>;

impl GuardError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GuardError::InvalidRequest(_) => ErrorCode::InvalidRequest,
            GuardError::DuplicateNonce { .. } => ErrorCode::DuplicateNonce,
            GuardError::NotFound(_) => ErrorCode::NotFound,
            GuardError::RequestClosed { .. } => ErrorCode::RequestClosed,
            GuardError::InvalidSignature { .. } => ErrorCode::InvalidSignature,
            GuardError::NotAGuardian { .. } => ErrorCode::NotAGuardian,
            GuardError::DuplicateSigner { .. } => ErrorCode::DuplicateSigner,
            GuardError::QuorumNotMet { .. } => ErrorCode::QuorumNotMet,
            GuardError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            GuardError::DependencyUnavailable { .. } => ErrorCode::DependencyUnavailable,
            GuardError::StorageError { .. } => ErrorCode::StorageError,
            GuardError::SerializationError { .. } => ErrorCode::SerializationError,
            GuardError::ConfigError(_) => ErrorCode::ConfigError,
            GuardError::EncodingError(_) => ErrorCode::EncodingError,
            GuardError::Message(_) => ErrorCode::Message,
        }
    }

    pub fn context(&self) -> ErrorContext {
        ErrorContext { code: self.code(), message: self.to_string() }
    }

    /// Only collaborator outages are worth retrying; every other kind is a
    /// deterministic rejection of the input or the current state.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GuardError::DependencyUnavailable { .. })
    }

    pub fn dependency_unavailable(dependency: impl Into<String>, details: impl ToString) -> Self {
        GuardError::DependencyUnavailable { dependency: dependency.into(), details: details.to_string() }
    }

    pub fn invalid_signature(signer: impl ToString, reason: impl Into<String>) -> Self {
        GuardError::InvalidSignature { signer: signer.to_string(), reason: reason.into() }
    }

    pub fn invalid_transition(from: impl ToString, to: impl ToString) -> Self {
        GuardError::InvalidTransition { from: from.to_string(), to: to.to_string() }
    }
}

impl From<hex::FromHexError> for GuardError {
    fn from(err: hex::FromHexError) -> Self {
        GuardError::EncodingError(format!("hex decode error: {}", err))
    }
}

impl From<toml::de::Error> for GuardError {
    fn from(err: toml::de::Error) -> Self {
        GuardError::ConfigError(format!("TOML parsing error: {}", err))
    }
}

impl From<figment::Error> for GuardError {
    fn from(err: figment::Error) -> Self {
        GuardError::ConfigError(err.to_string())
    }
}

#[macro_export]
macro_rules! storage_err {
    ($op:expr, $err:expr) => {
        $crate::foundation::GuardError::StorageError { operation: $op.into(), details: $err.to_string() }
    };
}

impl From<io::Error> for GuardError {
    fn from(err: io::Error) -> Self {
        GuardError::StorageError { operation: "io".to_string(), details: err.to_string() }
    }
}

impl From<serde_json::Error> for GuardError {
    fn from(err: serde_json::Error) -> Self {
        GuardError::SerializationError { format: "json".to_string(), details: err.to_string() }
    }
}

// NOTE: Avoid adding generic "stringly" error conversions here.
// Use structured `GuardError` variants at the call site to preserve context.
