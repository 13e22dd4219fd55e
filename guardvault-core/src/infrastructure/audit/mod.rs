use log::{debug, info, trace, warn};
use std::sync::{Arc, Mutex, OnceLock};

pub use crate::domain::audit::types::{AuditEvent, GuardianAction};

pub trait AuditLogger: Send + Sync {
    fn log(&self, event: AuditEvent);
}

pub struct StructuredAuditLogger;

impl AuditLogger for StructuredAuditLogger {
    fn log(&self, event: AuditEvent) {
        let json = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(err) => {
                warn!("audit: failed to serialize audit event error={}", err);
                "{\"type\":\"serialize_failed\"}".to_string()
            }
        };
        debug!(target: "guardvault::audit::json", "audit event audit_event={}", json);
        info!(target: "guardvault::audit::human", "audit summary={}", human_summary(&event));
    }
}

/// Appends one JSON object per line.
pub struct FileAuditLogger {
    file: Arc<Mutex<std::fs::File>>,
}

impl FileAuditLogger {
    pub fn new(path: &std::path::Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file: Arc::new(Mutex::new(file)) })
    }
}

impl AuditLogger for FileAuditLogger {
    fn log(&self, event: AuditEvent) {
        use std::io::Write;

        let json = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(err) => {
                warn!("audit: failed to serialize audit event for file logger error={}", err);
                "{\"type\":\"serialize_failed\"}".to_string()
            }
        };
        match self.file.lock() {
            Ok(mut file) => {
                if let Err(err) = writeln!(file, "{}", json) {
                    warn!("audit: failed to write audit event to file error={}", err);
                    return;
                }
                if let Err(err) = file.flush() {
                    warn!("audit: failed to flush audit event to file error={}", err);
                }
            }
            Err(err) => {
                warn!("audit: failed to lock audit file mutex error={}", err);
            }
        }
    }
}

pub struct MultiAuditLogger {
    loggers: Vec<Box<dyn AuditLogger>>,
}

impl MultiAuditLogger {
    pub fn new() -> Self {
        Self { loggers: vec![] }
    }

    pub fn add_logger(&mut self, logger: Box<dyn AuditLogger>) {
        self.loggers.push(logger);
    }
}

impl Default for MultiAuditLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditLogger for MultiAuditLogger {
    fn log(&self, event: AuditEvent) {
        for logger in &self.loggers {
            logger.log(event.clone());
        }
    }
}

static AUDIT_LOGGER: OnceLock<Box<dyn AuditLogger>> = OnceLock::new();

const SHORT_ID_DISPLAY_LENGTH: usize = 10;

pub fn init_audit_logger(logger: Box<dyn AuditLogger>) {
    if AUDIT_LOGGER.set(logger).is_err() {
        warn!("init_audit_logger called more than once; ignoring");
    }
}

pub fn audit(event: AuditEvent) {
    match AUDIT_LOGGER.get() {
        Some(logger) => logger.log(event),
        None => trace!("audit event dropped: no logger configured event={:?}", event),
    }
}

fn short_id(value: &str) -> String {
    let trimmed = value.trim_start_matches("0x").trim_start_matches("0X");
    if trimmed.len() <= SHORT_ID_DISPLAY_LENGTH {
        value.to_string()
    } else {
        format!("0x{}..", &trimmed[..SHORT_ID_DISPLAY_LENGTH])
    }
}

fn human_summary(event: &AuditEvent) -> String {
    match event {
        AuditEvent::RequestCreated { request_id, vault, creator, nonce, amount, quorum, .. } => format!(
            "AUDIT: withdrawal request created - amount={} nonce={} quorum={} (request: {}, vault: {}, creator: {})",
            amount,
            nonce,
            quorum,
            request_id,
            short_id(vault),
            short_id(creator)
        ),
        AuditEvent::SignatureAccepted { request_id, signer, signature_count, quorum, .. } => format!(
            "AUDIT: guardian signature accepted - sigs={}/{} signer={} (request: {})",
            signature_count,
            quorum,
            short_id(signer),
            request_id
        ),
        AuditEvent::SignatureRejected { request_id, signer, reason, .. } => {
            format!("AUDIT: guardian signature rejected - signer={} reason={} (request: {})", short_id(signer), reason, request_id)
        }
        AuditEvent::QuorumReached { request_id, vault, valid_signers, quorum, .. } => format!(
            "AUDIT: quorum reached - valid={}/{} (request: {}, vault: {})",
            valid_signers,
            quorum,
            request_id,
            short_id(vault)
        ),
        AuditEvent::WithdrawalExecuted { request_id, vault, tx_hash, .. } => {
            format!("AUDIT: withdrawal executed - tx={} (request: {}, vault: {})", short_id(tx_hash), request_id, short_id(vault))
        }
        AuditEvent::RequestRejected { request_id, actor, previous_status, .. } => {
            format!("AUDIT: withdrawal request rejected - from={} by={} (request: {})", previous_status, short_id(actor), request_id)
        }
        AuditEvent::RequestDeleted { request_id, actor, .. } => {
            format!("AUDIT: withdrawal request deleted - by={} (request: {})", short_id(actor), request_id)
        }
        AuditEvent::GuardianChanged { vault, guardian, action, .. } => {
            format!("AUDIT: guardian {:?} - guardian={} vault={}", action, short_id(guardian), short_id(vault))
        }
    }
}
