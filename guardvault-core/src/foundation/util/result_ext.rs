//! Result/Option helper traits.
//!
//! This module provides a small extension trait that makes it easier to work with
//! `Result<Option<T>>` values returned by the store.

use crate::foundation::GuardError;

/// Extension for converting `Result<Option<T>>` into `Result<T>`.
pub trait ResultExt<T> {
    /// Convert `Ok(None)` into an error.
    fn required(self, error: impl FnOnce() -> GuardError) -> Result<T, GuardError>;
}

impl<T> ResultExt<T> for Result<Option<T>, GuardError> {
    fn required(self, error: impl FnOnce() -> GuardError) -> Result<T, GuardError> {
        self?.ok_or_else(error)
    }
}
