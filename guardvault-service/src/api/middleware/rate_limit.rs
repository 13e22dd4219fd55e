use crate::api::state::RpcState;
use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use guardvault_core::foundation::{RPC_RATE_LIMIT_CLEANUP_INTERVAL_SECS, RPC_RATE_LIMIT_ENTRY_TTL_SECS, RPC_RATE_LIMIT_WINDOW_SECS};
use log::{debug, error};
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Token bucket: refills `rps` tokens per window, holds at most `rps + burst`.
#[derive(Debug)]
struct Bucket {
    tokens: f64,
    refilled_at: Instant,
}

impl Bucket {
    fn full(now: Instant, capacity: f64) -> Self {
        Self { tokens: capacity, refilled_at: now }
    }

    fn try_take(&mut self, now: Instant, rps: u32, capacity: f64) -> bool {
        let window = Duration::from_secs(RPC_RATE_LIMIT_WINDOW_SECS).as_secs_f64();
        let elapsed = now.saturating_duration_since(self.refilled_at).as_secs_f64();
        self.tokens = (self.tokens + elapsed * f64::from(rps) / window).min(capacity);
        self.refilled_at = now;
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

#[derive(Debug)]
struct Buckets {
    per_ip: HashMap<IpAddr, Bucket>,
    swept_at: Instant,
}

impl Buckets {
    fn sweep(&mut self, now: Instant) {
        if now.saturating_duration_since(self.swept_at) < Duration::from_secs(RPC_RATE_LIMIT_CLEANUP_INTERVAL_SECS) {
            return;
        }
        self.swept_at = now;
        let ttl = Duration::from_secs(RPC_RATE_LIMIT_ENTRY_TTL_SECS);
        self.per_ip.retain(|_, bucket| now.saturating_duration_since(bucket.refilled_at) < ttl);
    }
}

/// Per client IP admission control for `/rpc`.
#[derive(Debug)]
pub struct RateLimiter {
    inner: Mutex<Buckets>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self { inner: Mutex::new(Buckets { per_ip: HashMap::new(), swept_at: Instant::now() }) }
    }

    pub fn allow(&self, now: Instant, client_ip: IpAddr, rps: u32, burst: u32) -> bool {
        let capacity = f64::from(rps.max(1)) + f64::from(burst);
        let Ok(mut buckets) = self.inner.lock() else {
            error!("rate limiter lock poisoned; denying request client_ip={}", client_ip);
            return false;
        };
        buckets.sweep(now);
        buckets.per_ip.entry(client_ip).or_insert_with(|| Bucket::full(now, capacity)).try_take(now, rps.max(1), capacity)
    }

    pub fn tracked_clients(&self) -> usize {
        self.inner.lock().map(|buckets| buckets.per_ip.len()).unwrap_or(0)
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn rate_limit_middleware(
    State(state): State<Arc<RpcState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let client_ip = addr.ip();
    if !state.rate_limiter.allow(Instant::now(), client_ip, state.rate_limit_rps, state.rate_limit_burst) {
        debug!("rate limit exceeded client_ip={} rps={} burst={}", client_ip, state.rate_limit_rps, state.rate_limit_burst);
        state.metrics.inc_rate_limited();
        return (StatusCode::TOO_MANY_REQUESTS, "rate limit exceeded").into_response();
    }
    next.run(req).await
}
