use guardvault_core::application::WithdrawalObserver;
use guardvault_core::domain::{PendingWithdrawalRequest, QuorumReport, WithdrawalStatus};
use guardvault_core::foundation::{Address, GuardError, RequestId};
use log::debug;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub uptime: Duration,
    pub rpc_ok: u64,
    pub rpc_error: u64,
    pub requests_created: u64,
    pub approvals: u64,
}

/// Prometheus counters for the RPC surface and the withdrawal lifecycle.
///
/// Also registered as a [`WithdrawalObserver`] so lifecycle counters move only
/// after the coordinator has committed.
pub struct Metrics {
    registry: Registry,
    rpc_requests_total: IntCounterVec,
    rate_limited_total: IntCounter,
    withdrawal_events_total: IntCounterVec,
    status_transitions_total: IntCounterVec,
    started_at: Instant,
    rpc_ok: AtomicU64,
    rpc_error: AtomicU64,
    requests_created: AtomicU64,
    approvals: AtomicU64,
}

fn metric_err(err: prometheus::Error) -> GuardError {
    GuardError::Message(format!("metrics: {err}"))
}

impl Metrics {
    pub fn new() -> Result<Self, GuardError> {
        let registry = Registry::new();
        let rpc_requests_total =
            IntCounterVec::new(Opts::new("rpc_requests_total", "RPC requests by method and status"), &["method", "status"]).map_err(metric_err)?;
        let rate_limited_total = IntCounter::new("rpc_rate_limited_total", "RPC requests refused by the rate limiter").map_err(metric_err)?;
        let withdrawal_events_total =
            IntCounterVec::new(Opts::new("withdrawal_events_total", "Withdrawal lifecycle events"), &["event"]).map_err(metric_err)?;
        let status_transitions_total =
            IntCounterVec::new(Opts::new("withdrawal_status_transitions_total", "Withdrawal status transitions"), &["from", "to"])
                .map_err(metric_err)?;

        registry.register(Box::new(rpc_requests_total.clone())).map_err(metric_err)?;
        registry.register(Box::new(rate_limited_total.clone())).map_err(metric_err)?;
        registry.register(Box::new(withdrawal_events_total.clone())).map_err(metric_err)?;
        registry.register(Box::new(status_transitions_total.clone())).map_err(metric_err)?;
        debug!("prometheus metrics registered metric_count=4");

        Ok(Self {
            registry,
            rpc_requests_total,
            rate_limited_total,
            withdrawal_events_total,
            status_transitions_total,
            started_at: Instant::now(),
            rpc_ok: AtomicU64::new(0),
            rpc_error: AtomicU64::new(0),
            requests_created: AtomicU64::new(0),
            approvals: AtomicU64::new(0),
        })
    }

    pub fn inc_rpc_request(&self, method: &str, status: &str) {
        self.rpc_requests_total.with_label_values(&[method, status]).inc();
        let counter = if status == "ok" { &self.rpc_ok } else { &self.rpc_error };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rate_limited(&self) {
        self.rate_limited_total.inc();
    }

    fn inc_event(&self, event: &str) {
        self.withdrawal_events_total.with_label_values(&[event]).inc();
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime: self.started_at.elapsed(),
            rpc_ok: self.rpc_ok.load(Ordering::Relaxed),
            rpc_error: self.rpc_error.load(Ordering::Relaxed),
            requests_created: self.requests_created.load(Ordering::Relaxed),
            approvals: self.approvals.load(Ordering::Relaxed),
        }
    }

    pub fn encode(&self) -> Result<String, GuardError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer).map_err(metric_err)?;
        String::from_utf8(buffer).map_err(|err| GuardError::EncodingError(err.to_string()))
    }
}

impl WithdrawalObserver for Metrics {
    fn on_request_created(&self, _request: &PendingWithdrawalRequest) {
        self.requests_created.fetch_add(1, Ordering::Relaxed);
        self.inc_event("created");
    }

    fn on_signature_added(&self, _request: &PendingWithdrawalRequest, _signer: &Address) {
        self.inc_event("signature_added");
    }

    fn on_signature_rejected(&self, _request_id: &RequestId, _signer: &Address, _reason: &str) {
        self.inc_event("signature_rejected");
    }

    fn on_quorum_met(&self, _request: &PendingWithdrawalRequest, _report: &QuorumReport) {
        self.approvals.fetch_add(1, Ordering::Relaxed);
        self.inc_event("quorum_met");
    }

    fn on_status_changed(&self, request: &PendingWithdrawalRequest, old_status: WithdrawalStatus, _actor: Option<&Address>) {
        self.status_transitions_total.with_label_values(&[old_status.as_str(), request.status.as_str()]).inc();
    }
}
