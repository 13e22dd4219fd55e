use crate::api::RateLimiter;
use crate::service::metrics::Metrics;
use guardvault_core::application::WithdrawalCoordinator;
use std::sync::Arc;

#[derive(Clone)]
pub struct RpcState {
    pub coordinator: Arc<WithdrawalCoordinator>,
    pub rpc_token: Option<String>,
    pub metrics: Arc<Metrics>,
    pub rate_limiter: Arc<RateLimiter>,
    pub rate_limit_rps: u32,
    pub rate_limit_burst: u32,
}
