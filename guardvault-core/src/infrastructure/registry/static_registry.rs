use crate::domain::audit::GuardianAction;
use crate::domain::Guardian;
use crate::foundation::util::time::now_nanos;
use crate::foundation::{Address, GuardError};
use crate::infrastructure::audit::{audit, AuditEvent};
use crate::infrastructure::config::GuardianEntryConfig;
use crate::infrastructure::registry::GuardianRegistry;
use async_trait::async_trait;
use log::info;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-process guardian set, seeded from configuration and mutated by grant/revoke.
///
/// Stands in for an on-chain credential lookup; reads vastly outnumber writes.
#[derive(Default)]
pub struct StaticGuardianRegistry {
    vaults: RwLock<HashMap<Address, HashMap<Address, Guardian>>>,
}

impl StaticGuardianRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(entries: &[GuardianEntryConfig]) -> Self {
        let registry = Self::new();
        if let Ok(mut vaults) = registry.vaults.write() {
            for entry in entries {
                vaults.entry(entry.vault).or_default().insert(entry.address, entry.to_guardian());
            }
        }
        registry
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<Address, HashMap<Address, Guardian>>>, GuardError> {
        self.vaults.read().map_err(|_| GuardError::dependency_unavailable("guardian registry", "lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<Address, HashMap<Address, Guardian>>>, GuardError> {
        self.vaults.write().map_err(|_| GuardError::dependency_unavailable("guardian registry", "lock poisoned"))
    }

    /// Grants (or replaces) a guardian credential for `vault`.
    pub fn grant(&self, vault: Address, guardian: Guardian) -> Result<(), GuardError> {
        let address = guardian.address;
        self.write()?.entry(vault).or_default().insert(address, guardian);
        info!("guardian granted vault={} guardian={}", vault, address);
        audit(AuditEvent::GuardianChanged {
            vault: vault.to_string(),
            guardian: address.to_string(),
            action: GuardianAction::Granted,
            timestamp_ns: now_nanos(),
        });
        Ok(())
    }

    /// Returns `Ok(true)` if a credential was removed.
    pub fn revoke(&self, vault: &Address, address: &Address) -> Result<bool, GuardError> {
        let removed = self.write()?.get_mut(vault).and_then(|guardians| guardians.remove(address)).is_some();
        if removed {
            info!("guardian revoked vault={} guardian={}", vault, address);
            audit(AuditEvent::GuardianChanged {
                vault: vault.to_string(),
                guardian: address.to_string(),
                action: GuardianAction::Revoked,
                timestamp_ns: now_nanos(),
            });
        }
        Ok(removed)
    }

    pub fn guardians(&self, vault: &Address) -> Result<Vec<Guardian>, GuardError> {
        let mut out: Vec<Guardian> = self.read()?.get(vault).map(|g| g.values().cloned().collect()).unwrap_or_default();
        out.sort_by_key(|guardian| guardian.address);
        Ok(out)
    }
}

#[async_trait]
impl GuardianRegistry for StaticGuardianRegistry {
    async fn is_active_guardian(&self, vault: &Address, address: &Address) -> Result<bool, GuardError> {
        Ok(self.read()?.get(vault).is_some_and(|guardians| guardians.contains_key(address)))
    }
}
