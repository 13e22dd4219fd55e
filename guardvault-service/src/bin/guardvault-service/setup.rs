use guardvault_core::application::{AuditLoggingObserver, CompositeObserver, WithdrawalCoordinator};
use guardvault_core::foundation::{GuardError, DEFAULT_RATE_LIMIT_BURST, DEFAULT_RATE_LIMIT_RPS};
use guardvault_core::infrastructure::audit::{init_audit_logger, FileAuditLogger, MultiAuditLogger, StructuredAuditLogger};
use guardvault_core::infrastructure::config::AppConfig;
use guardvault_core::infrastructure::logging::init_logger;
use guardvault_core::infrastructure::registry::StaticGuardianRegistry;
use guardvault_core::infrastructure::storage::MemoryStore;
use guardvault_core::infrastructure::verifier::Eip191Verifier;
use guardvault_service::api::{RateLimiter, RpcState};
use guardvault_service::service::metrics::Metrics;
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;

pub fn load_app_config() -> Result<AppConfig, GuardError> {
    let data_dir = guardvault_core::infrastructure::config::resolve_data_dir()?;
    let config_path = guardvault_core::infrastructure::config::resolve_config_path(&data_dir)?;
    let config = guardvault_core::infrastructure::config::load_config_from_file(&config_path, &data_dir)?;
    if let Err(errors) = config.validate() {
        return Err(GuardError::ConfigError(errors.join("; ")));
    }
    Ok(config)
}

pub fn init_logging(app_config: &AppConfig, override_filters: Option<&str>) -> Result<(), GuardError> {
    let filters = override_filters.unwrap_or(&app_config.logging.filters);
    init_logger(app_config.logging.log_dir.as_deref(), filters)
}

pub fn init_audit(app_config: &AppConfig) -> Result<(), GuardError> {
    let mut audit = MultiAuditLogger::new();
    audit.add_logger(Box::new(StructuredAuditLogger));
    if let Some(path) = app_config.service.audit_log_path.as_deref() {
        audit.add_logger(Box::new(FileAuditLogger::new(Path::new(path))?));
        info!("audit file enabled path={}", path);
    }
    init_audit_logger(Box::new(audit));
    Ok(())
}

pub fn build_state(app_config: &AppConfig) -> Result<Arc<RpcState>, GuardError> {
    let registry = Arc::new(StaticGuardianRegistry::from_config(&app_config.guardians));
    if app_config.guardians.is_empty() {
        warn!("no guardians configured; every signature will be refused");
    }

    let metrics = Arc::new(Metrics::new()?);
    let mut observer = CompositeObserver::new();
    observer.add_observer(Arc::new(AuditLoggingObserver));
    observer.add_observer(metrics.clone());

    // Persistence beyond process lifetime is provided by deployments that plug in their own store.
    let coordinator = WithdrawalCoordinator::with_observer(
        Arc::new(MemoryStore::new()),
        Arc::new(Eip191Verifier::new()),
        registry,
        Arc::new(observer),
    );
    info!("coordinator ready guardians={} store=memory", app_config.guardians.len());

    Ok(Arc::new(RpcState {
        coordinator: Arc::new(coordinator),
        rpc_token: app_config.rpc.token.clone(),
        metrics,
        rate_limiter: Arc::new(RateLimiter::new()),
        rate_limit_rps: app_config.rpc.rate_limit_rps.unwrap_or(DEFAULT_RATE_LIMIT_RPS),
        rate_limit_burst: app_config.rpc.rate_limit_burst.unwrap_or(DEFAULT_RATE_LIMIT_BURST),
    }))
}

pub async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal error={}", err);
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
