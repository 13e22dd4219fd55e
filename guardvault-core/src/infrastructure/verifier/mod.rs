//! Signature verifier collaborator.

pub mod eip191;

pub use eip191::Eip191Verifier;

use crate::foundation::{Address, GuardError};
use async_trait::async_trait;

#[async_trait]
pub trait SignatureVerifier: Send + Sync {
    /// `Ok(false)` for any signature that does not prove `claimed_signer` signed `payload`,
    /// including malformed bytes. `Err` is reserved for the verifier itself being unavailable.
    async fn verify(&self, payload: &[u8], signature: &[u8], claimed_signer: &Address) -> Result<bool, GuardError>;
}
