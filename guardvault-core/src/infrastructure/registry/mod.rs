//! Guardian registry collaborator.

pub mod static_registry;

pub use static_registry::StaticGuardianRegistry;

use crate::foundation::{Address, GuardError};
use async_trait::async_trait;

/// Answers whether an address currently holds an active guardian credential for a vault.
///
/// Errors mean the registry could not be consulted; the coordinator reports them as
/// `DependencyUnavailable` and never treats them as "not a guardian".
#[async_trait]
pub trait GuardianRegistry: Send + Sync {
    async fn is_active_guardian(&self, vault: &Address, address: &Address) -> Result<bool, GuardError>;
}
