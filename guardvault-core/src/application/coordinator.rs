use crate::application::lifecycle::{AuditLoggingObserver, WithdrawalObserver};
use crate::application::locks::LockTable;
use crate::domain::canonical::canonical_payload;
use crate::domain::withdrawal::state_machine::transition;
use crate::domain::withdrawal::validation::validate_new_request;
use crate::domain::{
    AccountActivity, ActivityType, PendingWithdrawalRequest, QuorumReport, SignedWithdrawal, WithdrawalRequest, WithdrawalStatus,
};
use crate::foundation::util::hex_fmt::short_hex;
use crate::foundation::util::time::now_nanos;
use crate::foundation::util::ResultExt;
use crate::foundation::{Address, GuardError, RequestId, B256};
use crate::infrastructure::registry::GuardianRegistry;
use crate::infrastructure::storage::{RequestMutation, WithdrawalStore};
use crate::infrastructure::verifier::SignatureVerifier;
use log::{debug, info, warn};
use serde_json::json;
use std::sync::Arc;

/// Owns the withdrawal request lifecycle.
///
/// Every mutation holds the request's lock (the vault's lock for creation)
/// across its collaborator calls, then commits the aggregate change and its
/// activity entry with a single store call. A failed or cancelled call
/// therefore leaves no partial state behind. Reads take no locks.
pub struct WithdrawalCoordinator {
    store: Arc<dyn WithdrawalStore>,
    verifier: Arc<dyn SignatureVerifier>,
    registry: Arc<dyn GuardianRegistry>,
    observer: Arc<dyn WithdrawalObserver>,
    request_locks: LockTable<RequestId>,
    vault_locks: LockTable<Address>,
}

impl WithdrawalCoordinator {
    pub fn new(store: Arc<dyn WithdrawalStore>, verifier: Arc<dyn SignatureVerifier>, registry: Arc<dyn GuardianRegistry>) -> Self {
        Self::with_observer(store, verifier, registry, Arc::new(AuditLoggingObserver))
    }

    pub fn with_observer(
        store: Arc<dyn WithdrawalStore>,
        verifier: Arc<dyn SignatureVerifier>,
        registry: Arc<dyn GuardianRegistry>,
        observer: Arc<dyn WithdrawalObserver>,
    ) -> Self {
        Self { store, verifier, registry, observer, request_locks: LockTable::new(), vault_locks: LockTable::new() }
    }

    pub fn store(&self) -> &Arc<dyn WithdrawalStore> {
        &self.store
    }

    pub async fn create_request(
        &self,
        vault: Address,
        request: WithdrawalRequest,
        quorum: u32,
        creator: Address,
    ) -> Result<PendingWithdrawalRequest, GuardError> {
        if vault.is_zero() {
            return Err(GuardError::InvalidRequest("vault must not be the zero address".to_string()));
        }
        validate_new_request(&request, quorum)?;

        let _vault_guard = self.vault_locks.lock(&vault).await;
        if let Some(existing) = self.store.find_nonce_holder(&vault, &request.nonce).await.map_err(store_unavailable)? {
            warn!("duplicate nonce rejected vault={} nonce={} existing_request_id={}", vault, request.nonce, existing.id);
            return Err(GuardError::DuplicateNonce {
                vault: vault.to_string(),
                nonce: request.nonce.to_string(),
                existing_id: existing.id.to_string(),
            });
        }

        let pending = PendingWithdrawalRequest::new(RequestId::generate(), vault, request, quorum, creator, now_nanos());
        let activity = AccountActivity::new(
            creator,
            ActivityType::CreateRequest,
            json!({
                "vault": vault,
                "token": pending.request.token,
                "amount": pending.request.amount.to_string(),
                "recipient": pending.request.recipient,
                "nonce": pending.request.nonce.to_string(),
                "quorum": quorum,
            }),
            Some(pending.id.clone()),
        );
        self.store.commit(RequestMutation::Put(pending.clone()), activity).await.map_err(store_unavailable)?;

        info!(
            "withdrawal request created request_id={} vault={} nonce={} amount={} quorum={} creator={}",
            pending.id, vault, pending.request.nonce, pending.request.amount, quorum, creator
        );
        self.observer.on_request_created(&pending);
        Ok(pending)
    }

    /// Records a guardian signature, approving the request once quorum is met.
    ///
    /// Resubmitting the exact same signature bytes is a no-op that returns the
    /// current aggregate.
    pub async fn submit_signature(
        &self,
        request_id: &RequestId,
        signed: SignedWithdrawal,
    ) -> Result<PendingWithdrawalRequest, GuardError> {
        let signer = signed.signer;
        let result = self.submit_signature_locked(request_id, signed).await;
        if let Err(err) = &result {
            if matches!(err, GuardError::InvalidSignature { .. } | GuardError::NotAGuardian { .. } | GuardError::DuplicateSigner { .. }) {
                self.observer.on_signature_rejected(request_id, &signer, &err.to_string());
            }
        }
        result
    }

    async fn submit_signature_locked(
        &self,
        request_id: &RequestId,
        signed: SignedWithdrawal,
    ) -> Result<PendingWithdrawalRequest, GuardError> {
        let _guard = self.request_locks.lock(request_id).await;

        let mut pending = self.load(request_id).await?;
        if !pending.status.is_open() {
            return Err(GuardError::RequestClosed { request_id: request_id.to_string(), status: pending.status.to_string() });
        }

        if signed.request != pending.request {
            return Err(GuardError::invalid_signature(signed.signer, "signed request does not match stored request"));
        }

        let payload = canonical_payload(&pending.vault, &pending.request);
        let verified = self
            .verifier
            .verify(&payload, &signed.signature, &signed.signer)
            .await
            .map_err(|err| unavailable("signature verifier", err))?;
        if !verified {
            debug!(
                "signature verification failed request_id={} signer={} signature={}",
                request_id,
                signed.signer,
                short_hex(&signed.signature)
            );
            return Err(GuardError::invalid_signature(signed.signer, "signature does not verify over canonical payload"));
        }

        let active = self
            .registry
            .is_active_guardian(&pending.vault, &signed.signer)
            .await
            .map_err(|err| unavailable("guardian registry", err))?;
        if !active {
            return Err(GuardError::NotAGuardian { vault: pending.vault.to_string(), signer: signed.signer.to_string() });
        }

        if let Some(existing) = pending.signature_by(&signed.signer) {
            if existing.signature == signed.signature {
                debug!("idempotent signature resubmission request_id={} signer={}", request_id, signed.signer);
                return Ok(pending);
            }
            return Err(GuardError::DuplicateSigner { request_id: request_id.to_string(), signer: signed.signer.to_string() });
        }

        let signer = signed.signer;
        let mut signed = signed;
        signed.signed_at_nanos = now_nanos();
        pending.signatures.push(signed);

        let old_status = pending.status;
        let report = if pending.status == WithdrawalStatus::Pending {
            let report = self.quorum_report(&pending).await?;
            if report.met {
                transition(&mut pending, WithdrawalStatus::Approved)?;
            }
            Some(report)
        } else {
            None
        };
        let approved_now = old_status != pending.status;

        let activity = AccountActivity::new(
            signer,
            ActivityType::SignRequest,
            json!({
                "vault": pending.vault,
                "signature_count": pending.signature_count(),
                "valid_signers": report.as_ref().map(|r| r.count),
                "quorum": pending.quorum,
                "approved": approved_now,
            }),
            Some(pending.id.clone()),
        );
        self.store.commit(RequestMutation::Put(pending.clone()), activity).await.map_err(store_unavailable)?;

        info!(
            "guardian signature accepted request_id={} signer={} signatures={} quorum={} status={}",
            pending.id,
            signer,
            pending.signature_count(),
            pending.quorum,
            pending.status
        );
        self.observer.on_signature_added(&pending, &signer);
        if let (true, Some(report)) = (approved_now, report.as_ref()) {
            self.observer.on_quorum_met(&pending, report);
            self.observer.on_status_changed(&pending, old_status, None);
        }
        Ok(pending)
    }

    /// Recounts signatures against the current guardian set. Never mutates.
    pub async fn evaluate_quorum(&self, request_id: &RequestId) -> Result<QuorumReport, GuardError> {
        let pending = self.load(request_id).await?;
        self.quorum_report(&pending).await
    }

    /// Records that the approved withdrawal was executed on-chain.
    pub async fn mark_executed(&self, request_id: &RequestId, tx_hash: B256) -> Result<PendingWithdrawalRequest, GuardError> {
        let _guard = self.request_locks.lock(request_id).await;

        let mut pending = self.load(request_id).await?;
        if pending.status == WithdrawalStatus::Pending {
            let count = u32::try_from(pending.signature_count()).unwrap_or(u32::MAX);
            return Err(GuardError::QuorumNotMet { required: pending.quorum, count });
        }
        if pending.status == WithdrawalStatus::Approved {
            // Approval is sticky; a later revocation only warrants a warning here.
            match self.quorum_report(&pending).await {
                Ok(report) if !report.met => warn!(
                    "executing request whose current quorum is no longer met request_id={} valid_signers={} quorum={} excluded={:?}",
                    request_id, report.count, report.required, report.excluded
                ),
                Ok(_) => {}
                Err(err) => warn!("could not re-check quorum before execution request_id={} error={}", request_id, err),
            }
        }

        let old_status = pending.status;
        transition(&mut pending, WithdrawalStatus::Executed)?;
        pending.executed_at_nanos = Some(now_nanos());
        pending.execution_tx_hash = Some(tx_hash);

        let activity = AccountActivity::new(
            pending.creator,
            ActivityType::ExecuteWithdrawal,
            json!({
                "vault": pending.vault,
                "tx_hash": tx_hash,
                "amount": pending.request.amount.to_string(),
                "recipient": pending.request.recipient,
            }),
            Some(pending.id.clone()),
        );
        self.store.commit(RequestMutation::Put(pending.clone()), activity).await.map_err(store_unavailable)?;

        info!("withdrawal executed request_id={} vault={} tx_hash={}", pending.id, pending.vault, tx_hash);
        self.observer.on_status_changed(&pending, old_status, None);
        Ok(pending)
    }

    pub async fn reject(&self, request_id: &RequestId, actor: Address) -> Result<PendingWithdrawalRequest, GuardError> {
        let _guard = self.request_locks.lock(request_id).await;

        let mut pending = self.load(request_id).await?;
        let old_status = pending.status;
        transition(&mut pending, WithdrawalStatus::Rejected)?;

        let activity = AccountActivity::new(
            actor,
            ActivityType::RejectRequest,
            json!({ "vault": pending.vault, "previous_status": old_status }),
            Some(pending.id.clone()),
        );
        self.store.commit(RequestMutation::Put(pending.clone()), activity).await.map_err(store_unavailable)?;

        info!("withdrawal request rejected request_id={} actor={} previous_status={}", pending.id, actor, old_status);
        self.observer.on_status_changed(&pending, old_status, Some(&actor));
        Ok(pending)
    }

    /// Removes a request that nobody has signed yet.
    pub async fn delete(&self, request_id: &RequestId, actor: Address) -> Result<(), GuardError> {
        let _guard = self.request_locks.lock(request_id).await;

        let mut pending = self.load(request_id).await?;
        if !pending.signatures.is_empty() {
            warn!("delete refused: request has signatures request_id={} signatures={}", request_id, pending.signature_count());
            return Err(GuardError::invalid_transition(
                format!("{} with {} signature(s)", pending.status, pending.signature_count()),
                WithdrawalStatus::Deleted,
            ));
        }
        let old_status = pending.status;
        transition(&mut pending, WithdrawalStatus::Deleted)?;

        let activity = AccountActivity::new(
            actor,
            ActivityType::DeleteRequest,
            json!({ "vault": pending.vault, "nonce": pending.request.nonce.to_string() }),
            Some(pending.id.clone()),
        );
        self.store.commit(RequestMutation::Delete(pending.id.clone()), activity).await.map_err(store_unavailable)?;

        info!("withdrawal request deleted request_id={} actor={}", pending.id, actor);
        self.observer.on_status_changed(&pending, old_status, Some(&actor));
        Ok(())
    }

    pub async fn get_request(&self, request_id: &RequestId) -> Result<PendingWithdrawalRequest, GuardError> {
        self.load(request_id).await
    }

    pub async fn list_by_vault(&self, vault: &Address) -> Result<Vec<PendingWithdrawalRequest>, GuardError> {
        self.store.list_by_vault(vault).await.map_err(store_unavailable)
    }

    pub async fn list_activities(&self, account: &Address) -> Result<Vec<AccountActivity>, GuardError> {
        self.store.list_activities_by_account(account).await.map_err(store_unavailable)
    }

    pub async fn health_check(&self) -> Result<(), GuardError> {
        self.store.health_check().await.map_err(store_unavailable)
    }

    async fn load(&self, request_id: &RequestId) -> Result<PendingWithdrawalRequest, GuardError> {
        self.store.get(request_id).await.map_err(store_unavailable).required(|| GuardError::NotFound(request_id.to_string()))
    }

    async fn quorum_report(&self, pending: &PendingWithdrawalRequest) -> Result<QuorumReport, GuardError> {
        let mut statuses = Vec::with_capacity(pending.signatures.len());
        for signer in pending.signers() {
            let active =
                self.registry.is_active_guardian(&pending.vault, signer).await.map_err(|err| unavailable("guardian registry", err))?;
            statuses.push((signer, active));
        }
        let report = QuorumReport::from_signer_status(pending.quorum, statuses);
        if !report.excluded.is_empty() {
            debug!(
                "quorum excludes signers without active credential request_id={} excluded={:?} valid={} quorum={}",
                pending.id, report.excluded, report.count, report.required
            );
        }
        Ok(report)
    }
}

fn unavailable(dependency: &str, err: GuardError) -> GuardError {
    match err {
        err @ GuardError::DependencyUnavailable { .. } => err,
        other => GuardError::dependency_unavailable(dependency, other),
    }
}

fn store_unavailable(err: GuardError) -> GuardError {
    unavailable("withdrawal store", err)
}
