use crate::domain::audit::AuditEvent;
use crate::domain::{PendingWithdrawalRequest, QuorumReport, WithdrawalStatus};
use crate::foundation::util::time::now_nanos;
use crate::foundation::{Address, RequestId};
use crate::infrastructure::audit::audit;
use log::{debug, info, trace};
use std::sync::Arc;

/// Hooks invoked by the coordinator after a mutation has been committed
/// (or, for `on_signature_rejected`, after a submission was refused).
pub trait WithdrawalObserver: Send + Sync {
    fn on_request_created(&self, _request: &PendingWithdrawalRequest) {}
    fn on_signature_added(&self, _request: &PendingWithdrawalRequest, _signer: &Address) {}
    fn on_signature_rejected(&self, _request_id: &RequestId, _signer: &Address, _reason: &str) {}
    fn on_quorum_met(&self, _request: &PendingWithdrawalRequest, _report: &QuorumReport) {}
    fn on_status_changed(&self, _request: &PendingWithdrawalRequest, _old_status: WithdrawalStatus, _actor: Option<&Address>) {}
}

pub struct NoopObserver;

impl WithdrawalObserver for NoopObserver {}

pub struct CompositeObserver {
    observers: Vec<Arc<dyn WithdrawalObserver>>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self { observers: Vec::new() }
    }

    pub fn add_observer(&mut self, observer: Arc<dyn WithdrawalObserver>) {
        self.observers.push(observer);
    }
}

impl Default for CompositeObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl WithdrawalObserver for CompositeObserver {
    fn on_request_created(&self, request: &PendingWithdrawalRequest) {
        trace!("on_request_created dispatch observer_count={} request_id={}", self.observers.len(), request.id);
        for observer in &self.observers {
            observer.on_request_created(request);
        }
    }

    fn on_signature_added(&self, request: &PendingWithdrawalRequest, signer: &Address) {
        trace!("on_signature_added dispatch observer_count={} request_id={}", self.observers.len(), request.id);
        for observer in &self.observers {
            observer.on_signature_added(request, signer);
        }
    }

    fn on_signature_rejected(&self, request_id: &RequestId, signer: &Address, reason: &str) {
        for observer in &self.observers {
            observer.on_signature_rejected(request_id, signer, reason);
        }
    }

    fn on_quorum_met(&self, request: &PendingWithdrawalRequest, report: &QuorumReport) {
        for observer in &self.observers {
            observer.on_quorum_met(request, report);
        }
    }

    fn on_status_changed(&self, request: &PendingWithdrawalRequest, old_status: WithdrawalStatus, actor: Option<&Address>) {
        for observer in &self.observers {
            observer.on_status_changed(request, old_status, actor);
        }
    }
}

/// Forwards lifecycle hooks to the process-global audit logger.
pub struct AuditLoggingObserver;

impl WithdrawalObserver for AuditLoggingObserver {
    fn on_request_created(&self, request: &PendingWithdrawalRequest) {
        audit(AuditEvent::RequestCreated {
            request_id: request.id.to_string(),
            vault: request.vault.to_string(),
            creator: request.creator.to_string(),
            nonce: request.request.nonce.to_string(),
            amount: request.request.amount.to_string(),
            quorum: request.quorum,
            payload_hash: crate::domain::canonical::payload_hash(&request.vault, &request.request).to_string(),
            timestamp_ns: now_nanos(),
        });
    }

    fn on_signature_added(&self, request: &PendingWithdrawalRequest, signer: &Address) {
        audit(AuditEvent::SignatureAccepted {
            request_id: request.id.to_string(),
            signer: signer.to_string(),
            signature_count: request.signature_count(),
            quorum: request.quorum,
            timestamp_ns: now_nanos(),
        });
    }

    fn on_signature_rejected(&self, request_id: &RequestId, signer: &Address, reason: &str) {
        debug!("signature rejected request_id={} signer={} reason={}", request_id, signer, reason);
        audit(AuditEvent::SignatureRejected {
            request_id: request_id.to_string(),
            signer: signer.to_string(),
            reason: reason.to_string(),
            timestamp_ns: now_nanos(),
        });
    }

    fn on_quorum_met(&self, request: &PendingWithdrawalRequest, report: &QuorumReport) {
        info!("quorum reached request_id={} vault={} valid_signers={} quorum={}", request.id, request.vault, report.count, report.required);
        audit(AuditEvent::QuorumReached {
            request_id: request.id.to_string(),
            vault: request.vault.to_string(),
            valid_signers: report.count,
            quorum: report.required,
            timestamp_ns: now_nanos(),
        });
    }

    fn on_status_changed(&self, request: &PendingWithdrawalRequest, old_status: WithdrawalStatus, actor: Option<&Address>) {
        let actor = actor.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string());
        let event = match request.status {
            WithdrawalStatus::Executed => AuditEvent::WithdrawalExecuted {
                request_id: request.id.to_string(),
                vault: request.vault.to_string(),
                tx_hash: request.execution_tx_hash.map(|h| h.to_string()).unwrap_or_default(),
                timestamp_ns: now_nanos(),
            },
            WithdrawalStatus::Rejected => AuditEvent::RequestRejected {
                request_id: request.id.to_string(),
                actor,
                previous_status: old_status.to_string(),
                timestamp_ns: now_nanos(),
            },
            WithdrawalStatus::Deleted => {
                AuditEvent::RequestDeleted { request_id: request.id.to_string(), actor, timestamp_ns: now_nanos() }
            }
            // Approval is reported through `on_quorum_met`.
            WithdrawalStatus::Pending | WithdrawalStatus::Approved => return,
        };
        audit(event);
    }
}
