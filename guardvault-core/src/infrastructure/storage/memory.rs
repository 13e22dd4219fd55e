use crate::domain::{AccountActivity, PendingWithdrawalRequest};
use crate::foundation::GuardError;
use crate::foundation::{Address, RequestId, U256};
use crate::infrastructure::storage::{RequestMutation, WithdrawalStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct MemoryInner {
    requests: HashMap<RequestId, PendingWithdrawalRequest>,
    /// Request ids per vault in insertion order.
    vault_index: HashMap<Address, Vec<RequestId>>,
    activities: HashMap<Address, Vec<AccountActivity>>,
}

impl MemoryInner {
    fn apply(&mut self, mutation: RequestMutation) {
        match mutation {
            RequestMutation::Put(request) => self.put(request),
            RequestMutation::Delete(id) => {
                self.delete(&id);
            }
        }
    }

    fn put(&mut self, request: PendingWithdrawalRequest) {
        let ids = self.vault_index.entry(request.vault).or_default();
        if !ids.contains(&request.id) {
            ids.push(request.id.clone());
        }
        self.requests.insert(request.id.clone(), request);
    }

    fn delete(&mut self, id: &RequestId) -> bool {
        let Some(removed) = self.requests.remove(id) else {
            return false;
        };
        if let Some(ids) = self.vault_index.get_mut(&removed.vault) {
            ids.retain(|existing| existing != id);
        }
        true
    }

    fn append_activity(&mut self, entry: AccountActivity) {
        self.activities.entry(entry.account).or_default().push(entry);
    }
}

/// Process-local store. Cloning shares the underlying maps.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { inner: Arc::new(Mutex::new(MemoryInner::default())) }
    }

    fn lock_inner(&self) -> Result<MutexGuard<'_, MemoryInner>, GuardError> {
        self.inner.lock().map_err(|_| crate::storage_err!("memory store lock", "poisoned"))
    }

    pub fn request_count(&self) -> Result<usize, GuardError> {
        Ok(self.lock_inner()?.requests.len())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WithdrawalStore for MemoryStore {
    async fn get(&self, id: &RequestId) -> Result<Option<PendingWithdrawalRequest>, GuardError> {
        Ok(self.lock_inner()?.requests.get(id).cloned())
    }

    async fn put(&self, request: PendingWithdrawalRequest) -> Result<(), GuardError> {
        self.lock_inner()?.put(request);
        Ok(())
    }

    async fn delete(&self, id: &RequestId) -> Result<bool, GuardError> {
        Ok(self.lock_inner()?.delete(id))
    }

    async fn list_by_vault(&self, vault: &Address) -> Result<Vec<PendingWithdrawalRequest>, GuardError> {
        let inner = self.lock_inner()?;
        let mut out: Vec<PendingWithdrawalRequest> = inner
            .vault_index
            .get(vault)
            .map(|ids| ids.iter().filter_map(|id| inner.requests.get(id).cloned()).collect())
            .unwrap_or_default();
        // Stable sort keeps insertion order for equal timestamps.
        out.sort_by_key(|request| request.created_at_nanos);
        Ok(out)
    }

    async fn append_activity(&self, entry: AccountActivity) -> Result<(), GuardError> {
        self.lock_inner()?.append_activity(entry);
        Ok(())
    }

    async fn list_activities_by_account(&self, account: &Address) -> Result<Vec<AccountActivity>, GuardError> {
        let mut out = self.lock_inner()?.activities.get(account).cloned().unwrap_or_default();
        out.sort_by_key(|entry| entry.timestamp_nanos);
        Ok(out)
    }

    async fn commit(&self, mutation: RequestMutation, activity: AccountActivity) -> Result<(), GuardError> {
        let mut inner = self.lock_inner()?;
        inner.apply(mutation);
        inner.append_activity(activity);
        Ok(())
    }

    async fn find_nonce_holder(&self, vault: &Address, nonce: &U256) -> Result<Option<PendingWithdrawalRequest>, GuardError> {
        let inner = self.lock_inner()?;
        let found = inner.vault_index.get(vault).and_then(|ids| {
            ids.iter()
                .filter_map(|id| inner.requests.get(id))
                .find(|request| request.request.nonce == *nonce && request.status.holds_nonce())
                .cloned()
        });
        Ok(found)
    }

    async fn health_check(&self) -> Result<(), GuardError> {
        self.lock_inner().map(|_| ())
    }
}
