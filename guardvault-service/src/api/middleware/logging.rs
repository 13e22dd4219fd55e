use super::correlation::CorrelationId;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::{debug, error, trace, warn, Level};
use std::net::SocketAddr;
use std::time::Instant;

const HTTP_TARGET: &str = "guardvault_service::http";
const REDACTED_HEADERS: &[&str] = &["authorization", "x-api-key", "cookie"];

fn redacted_headers(headers: &axum::http::HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if REDACTED_HEADERS.contains(&name.as_str()) {
                "<redacted>".to_string()
            } else {
                value.to_str().map(|s| s.chars().take(128).collect()).unwrap_or_else(|_| "<non-utf8>".to_string())
            };
            (name.as_str().to_string(), shown)
        })
        .collect()
}

fn content_length(headers: &axum::http::HeaderMap) -> u64 {
    headers.get(axum::http::header::CONTENT_LENGTH).and_then(|v| v.to_str().ok()).and_then(|s| s.parse().ok()).unwrap_or(0)
}

pub async fn logging_middleware(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let client_ip = req.extensions().get::<ConnectInfo<SocketAddr>>().map(|ConnectInfo(addr)| addr.ip().to_string()).unwrap_or_default();
    let correlation_id = req.extensions().get::<CorrelationId>().map(|id| id.0.clone()).unwrap_or_default();
    let request_bytes = content_length(req.headers());
    trace!(target: HTTP_TARGET, "request headers correlation_id={} headers={:?}", correlation_id, redacted_headers(req.headers()));
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let level = match (path.as_str(), status) {
        ("/health" | "/ready" | "/metrics", s) if s.is_success() => Level::Trace,
        (_, s) if s.is_server_error() => Level::Error,
        (_, s) if s.is_client_error() => Level::Warn,
        _ => Level::Debug,
    };
    let line = format!(
        "http request correlation_id={} client_ip={} method={} path={} status={} duration_ms={} request_bytes={} response_bytes={}",
        correlation_id,
        client_ip,
        method,
        path,
        status.as_u16(),
        start.elapsed().as_millis(),
        request_bytes,
        content_length(response.headers())
    );
    match level {
        Level::Error => error!(target: HTTP_TARGET, "{}", line),
        Level::Warn => warn!(target: HTTP_TARGET, "{}", line),
        Level::Trace => trace!(target: HTTP_TARGET, "{}", line),
        _ => debug!(target: HTTP_TARGET, "{}", line),
    }
    response
}
