use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use std::fmt;
use subtle::ConstantTimeEq;

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthError {
    MissingCredentials,
    InvalidCredentials,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredentials => f.write_str("unauthorized: missing api token"),
            Self::InvalidCredentials => f.write_str("unauthorized: invalid api token"),
        }
    }
}

/// Accepts `x-api-key: <token>` or `Authorization: Bearer <token>`.
/// Everything passes when no token is configured.
pub fn authorize(headers: &HeaderMap, expected: Option<&str>) -> Result<(), AuthError> {
    let Some(expected) = expected.map(str::trim).filter(|token| !token.is_empty()) else {
        return Ok(());
    };

    let presented = [
        headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()),
        headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()).and_then(|v| v.strip_prefix("Bearer ")),
    ];
    let mut any_presented = false;
    for candidate in presented.into_iter().flatten() {
        any_presented = true;
        if bool::from(candidate.trim().as_bytes().ct_eq(expected.as_bytes())) {
            return Ok(());
        }
    }
    if any_presented {
        Err(AuthError::InvalidCredentials)
    } else {
        Err(AuthError::MissingCredentials)
    }
}
