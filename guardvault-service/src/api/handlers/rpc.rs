use super::types::{json_err, json_guard_err, json_ok, JsonRpcRequest, RpcErrorCode};
use super::{activity, withdrawal};
use crate::api::middleware::auth::authorize;
use crate::api::middleware::correlation::CorrelationId;
use crate::api::state::RpcState;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Extension;
use guardvault_core::foundation::GuardError;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Upper bound on calls in one batch.
const MAX_BATCH_LEN: usize = 32;

enum RpcFailure {
    InvalidParams(String),
    MethodNotFound,
    Guard(GuardError),
}

impl From<GuardError> for RpcFailure {
    fn from(err: GuardError) -> Self {
        Self::Guard(err)
    }
}

pub async fn handle_rpc(
    State(state): State<Arc<RpcState>>,
    correlation: Option<Extension<CorrelationId>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let started = Instant::now();
    let correlation_id = correlation.map(|Extension(id)| id.0).unwrap_or_default();
    let Ok(value) = serde_json::from_str::<Value>(&body) else {
        state.metrics.inc_rpc_request("<unparsed>", RpcErrorCode::ParseError.label());
        debug!("rpc parse error correlation_id={} body_len={}", correlation_id, body.len());
        return axum::Json(json_err(Value::Null, RpcErrorCode::ParseError, "parse error")).into_response();
    };

    let outcome = match value {
        Value::Array(batch) if batch.is_empty() => json_err(Value::Null, RpcErrorCode::InvalidRequest, "empty batch"),
        Value::Array(batch) if batch.len() > MAX_BATCH_LEN => {
            json_err(Value::Null, RpcErrorCode::InvalidRequest, format!("batch exceeds {MAX_BATCH_LEN} calls"))
        }
        Value::Array(batch) => {
            debug!("rpc batch request correlation_id={} batch_size={}", correlation_id, batch.len());
            let mut out = Vec::with_capacity(batch.len());
            for item in batch {
                out.push(handle_value(&state, &headers, &correlation_id, item).await);
            }
            Value::Array(out)
        }
        single => handle_value(&state, &headers, &correlation_id, single).await,
    };

    debug!("rpc handled correlation_id={} elapsed_ms={}", correlation_id, started.elapsed().as_millis());
    axum::Json(outcome).into_response()
}

async fn handle_value(state: &RpcState, headers: &HeaderMap, correlation_id: &str, value: Value) -> Value {
    match serde_json::from_value::<JsonRpcRequest>(value) {
        Ok(req) => handle_single(state, headers, correlation_id, req).await,
        Err(err) => {
            state.metrics.inc_rpc_request("<invalid>", RpcErrorCode::InvalidRequest.label());
            json_err(Value::Null, RpcErrorCode::InvalidRequest, err.to_string())
        }
    }
}

async fn handle_single(state: &RpcState, headers: &HeaderMap, correlation_id: &str, req: JsonRpcRequest) -> Value {
    let id = req.id;
    let method = req.method;

    if req.jsonrpc.as_deref().is_some_and(|version| version != "2.0") {
        state.metrics.inc_rpc_request(&method, RpcErrorCode::InvalidRequest.label());
        debug!("rpc invalid jsonrpc version correlation_id={} method={}", correlation_id, method);
        return json_err(id, RpcErrorCode::InvalidRequest, "jsonrpc must be '2.0'");
    }

    if let Err(err) = authorize(headers, state.rpc_token.as_deref()) {
        state.metrics.inc_rpc_request(&method, RpcErrorCode::Unauthorized.label());
        warn!("rpc unauthorized correlation_id={} method={} reason={}", correlation_id, method, err);
        return json_err(id, RpcErrorCode::Unauthorized, err.to_string());
    }

    debug!("rpc request correlation_id={} method={}", correlation_id, method);
    match dispatch(state, &method, req.params).await {
        Ok(result) => {
            state.metrics.inc_rpc_request(&method, "ok");
            json_ok(id, result)
        }
        Err(RpcFailure::MethodNotFound) => {
            state.metrics.inc_rpc_request("<unknown>", RpcErrorCode::MethodNotFound.label());
            debug!("rpc method not found correlation_id={} method={}", correlation_id, method);
            json_err(id, RpcErrorCode::MethodNotFound, "method not found")
        }
        Err(RpcFailure::InvalidParams(message)) => {
            state.metrics.inc_rpc_request(&method, RpcErrorCode::InvalidParams.label());
            debug!("rpc invalid params correlation_id={} method={} error={}", correlation_id, method, message);
            json_err(id, RpcErrorCode::InvalidParams, message)
        }
        Err(RpcFailure::Guard(err)) => {
            let code = RpcErrorCode::for_error(&err);
            state.metrics.inc_rpc_request(&method, code.label());
            if code == RpcErrorCode::InternalError || err.is_retryable() {
                warn!("rpc failed correlation_id={} method={} code={} error={}", correlation_id, method, code as i64, err);
            } else {
                info!("rpc refused correlation_id={} method={} code={} error={}", correlation_id, method, code as i64, err);
            }
            json_guard_err(id, &err)
        }
    }
}

async fn dispatch(state: &RpcState, method: &str, params: Option<Value>) -> Result<Value, RpcFailure> {
    match method {
        "withdrawal.create" => encode(withdrawal::create(state, parse(params)?).await?),
        "withdrawal.sign" => encode(withdrawal::sign(state, parse(params)?).await?),
        "withdrawal.get" => encode(withdrawal::get(state, parse(params)?).await?),
        "withdrawal.quorum" => encode(withdrawal::quorum(state, parse(params)?).await?),
        "withdrawal.execute" => encode(withdrawal::execute(state, parse(params)?).await?),
        "withdrawal.reject" => encode(withdrawal::reject(state, parse(params)?).await?),
        "withdrawal.delete" => encode(withdrawal::delete(state, parse(params)?).await?),
        "withdrawal.list_by_vault" => encode(withdrawal::list_by_vault(state, parse(params)?).await?),
        "activity.list_by_account" => encode(activity::list_by_account(state, parse(params)?).await?),
        _ => Err(RpcFailure::MethodNotFound),
    }
}

fn parse<T: DeserializeOwned>(params: Option<Value>) -> Result<T, RpcFailure> {
    let params = params.ok_or_else(|| RpcFailure::InvalidParams("missing params".to_string()))?;
    serde_json::from_value(params).map_err(|err| RpcFailure::InvalidParams(err.to_string()))
}

fn encode<T: Serialize>(result: T) -> Result<Value, RpcFailure> {
    serde_json::to_value(result).map_err(|err| RpcFailure::Guard(err.into()))
}
