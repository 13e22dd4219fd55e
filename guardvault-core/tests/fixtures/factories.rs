#![allow(dead_code)]

use crate::fixtures::{guardian_keys, GuardianKey, TEST_VAULT};
use async_trait::async_trait;
use guardvault_core::application::{WithdrawalCoordinator, WithdrawalObserver};
use guardvault_core::domain::{AccountActivity, PendingWithdrawalRequest, QuorumReport, WithdrawalStatus};
use guardvault_core::foundation::{Address, GuardError, RequestId, U256};
use guardvault_core::infrastructure::registry::{GuardianRegistry, StaticGuardianRegistry};
use guardvault_core::infrastructure::storage::{MemoryStore, RequestMutation, WithdrawalStore};
use guardvault_core::infrastructure::verifier::Eip191Verifier;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Records lifecycle callbacks so tests can assert on transitions.
#[derive(Default)]
pub struct RecordingObserver {
    pub created: AtomicUsize,
    pub signatures_added: AtomicUsize,
    pub signatures_rejected: AtomicUsize,
    pub quorum_met: AtomicUsize,
    pub transitions: Mutex<Vec<(RequestId, WithdrawalStatus, WithdrawalStatus)>>,
}

impl RecordingObserver {
    pub fn transitions_to(&self, status: WithdrawalStatus) -> usize {
        self.transitions.lock().expect("transitions lock").iter().filter(|(_, _, to)| *to == status).count()
    }
}

impl WithdrawalObserver for RecordingObserver {
    fn on_request_created(&self, _request: &PendingWithdrawalRequest) {
        self.created.fetch_add(1, Ordering::SeqCst);
    }

    fn on_signature_added(&self, _request: &PendingWithdrawalRequest, _signer: &Address) {
        self.signatures_added.fetch_add(1, Ordering::SeqCst);
    }

    fn on_signature_rejected(&self, _request_id: &RequestId, _signer: &Address, _reason: &str) {
        self.signatures_rejected.fetch_add(1, Ordering::SeqCst);
    }

    fn on_quorum_met(&self, _request: &PendingWithdrawalRequest, _report: &QuorumReport) {
        self.quorum_met.fetch_add(1, Ordering::SeqCst);
    }

    fn on_status_changed(&self, request: &PendingWithdrawalRequest, old_status: WithdrawalStatus, _actor: Option<&Address>) {
        self.transitions.lock().expect("transitions lock").push((request.id.clone(), old_status, request.status));
    }
}

pub struct Harness {
    pub coordinator: Arc<WithdrawalCoordinator>,
    pub store: MemoryStore,
    pub registry: Arc<StaticGuardianRegistry>,
    pub observer: Arc<RecordingObserver>,
    pub guardians: [GuardianKey; 3],
}

impl Harness {
    /// Guardians A, B, C all active on `TEST_VAULT`.
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let registry = Arc::new(StaticGuardianRegistry::new());
        let guardians = guardian_keys();
        for key in &guardians {
            registry.grant(TEST_VAULT, key.guardian()).expect("grant guardian");
        }
        let observer = Arc::new(RecordingObserver::default());
        let coordinator = Arc::new(WithdrawalCoordinator::with_observer(
            Arc::new(store.clone()),
            Arc::new(Eip191Verifier::new()),
            registry.clone(),
            observer.clone(),
        ));
        Self { coordinator, store, registry, observer, guardians }
    }

    pub fn a(&self) -> &GuardianKey {
        &self.guardians[0]
    }

    pub fn b(&self) -> &GuardianKey {
        &self.guardians[1]
    }

    pub fn c(&self) -> &GuardianKey {
        &self.guardians[2]
    }
}

/// Registry that fails or stalls on demand, delegating to a static registry otherwise.
pub struct ControlledRegistry {
    pub inner: StaticGuardianRegistry,
    pub fail: AtomicBool,
    pub delay: Mutex<Option<Duration>>,
    pub calls: AtomicUsize,
}

impl ControlledRegistry {
    pub fn with_guardians(vault: Address, keys: &[GuardianKey]) -> Self {
        let inner = StaticGuardianRegistry::new();
        for key in keys {
            inner.grant(vault, key.guardian()).expect("grant guardian");
        }
        Self { inner, fail: AtomicBool::new(false), delay: Mutex::new(None), calls: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl GuardianRegistry for ControlledRegistry {
    async fn is_active_guardian(&self, vault: &Address, address: &Address) -> Result<bool, GuardError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().expect("delay lock");
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(GuardError::Message("registry node timed out".to_string()));
        }
        self.inner.is_active_guardian(vault, address).await
    }
}

/// Store whose `commit` can be made to fail, delegating to a memory store otherwise.
#[derive(Clone)]
pub struct FailingCommitStore {
    pub inner: MemoryStore,
    pub fail_commit: Arc<AtomicBool>,
}

impl FailingCommitStore {
    pub fn new() -> Self {
        Self { inner: MemoryStore::new(), fail_commit: Arc::new(AtomicBool::new(false)) }
    }
}

#[async_trait]
impl WithdrawalStore for FailingCommitStore {
    async fn get(&self, id: &RequestId) -> Result<Option<PendingWithdrawalRequest>, GuardError> {
        self.inner.get(id).await
    }

    async fn put(&self, request: PendingWithdrawalRequest) -> Result<(), GuardError> {
        self.inner.put(request).await
    }

    async fn delete(&self, id: &RequestId) -> Result<bool, GuardError> {
        self.inner.delete(id).await
    }

    async fn list_by_vault(&self, vault: &Address) -> Result<Vec<PendingWithdrawalRequest>, GuardError> {
        self.inner.list_by_vault(vault).await
    }

    async fn append_activity(&self, entry: AccountActivity) -> Result<(), GuardError> {
        self.inner.append_activity(entry).await
    }

    async fn list_activities_by_account(&self, account: &Address) -> Result<Vec<AccountActivity>, GuardError> {
        self.inner.list_activities_by_account(account).await
    }

    async fn commit(&self, mutation: RequestMutation, activity: AccountActivity) -> Result<(), GuardError> {
        if self.fail_commit.load(Ordering::SeqCst) {
            return Err(GuardError::StorageError { operation: "commit".to_string(), details: "disk full".to_string() });
        }
        self.inner.commit(mutation, activity).await
    }

    async fn find_nonce_holder(&self, vault: &Address, nonce: &U256) -> Result<Option<PendingWithdrawalRequest>, GuardError> {
        self.inner.find_nonce_holder(vault, nonce).await
    }
}
