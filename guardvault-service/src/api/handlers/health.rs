use super::super::middleware::auth::authorize;
use super::super::state::RpcState;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{debug, trace};
use std::sync::Arc;

pub async fn handle_health() -> impl IntoResponse {
    trace!("health check: ok");
    Json(serde_json::json!({ "status": "healthy" }))
}

pub async fn handle_ready(State(state): State<Arc<RpcState>>) -> Response {
    match state.coordinator.health_check().await {
        Ok(()) => {
            trace!("ready check: ok");
            Json(serde_json::json!({ "status": "ready", "storage_ok": true })).into_response()
        }
        Err(err) => {
            debug!("ready check: degraded error={}", err);
            (StatusCode::SERVICE_UNAVAILABLE, Json(serde_json::json!({ "status": "degraded", "storage_ok": false }))).into_response()
        }
    }
}

pub async fn handle_metrics(State(state): State<Arc<RpcState>>, headers: HeaderMap) -> Response {
    if let Err(err) = authorize(&headers, state.rpc_token.as_deref()) {
        return (StatusCode::UNAUTHORIZED, err.to_string()).into_response();
    }

    match state.metrics.encode() {
        Ok(body) => {
            let mut response = body.into_response();
            response.headers_mut().insert(axum::http::header::CONTENT_TYPE, HeaderValue::from_static("text/plain; version=0.0.4"));
            response
        }
        Err(err) => {
            debug!("metrics encode failed error={}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics_error: {}", err)).into_response()
        }
    }
}
