use super::{call_rpc, client, send, service_with, ServiceOptions};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use guardvault_service::api::RpcErrorCode;
use serde_json::json;

fn protected() -> super::TestService {
    service_with(ServiceOptions { token: Some("secret-token"), ..ServiceOptions::default() })
}

#[tokio::test]
async fn rpc_requires_token_when_configured() {
    let svc = protected();
    let body = json!({ "jsonrpc": "2.0", "method": "withdrawal.list_by_vault", "params": { "vault": super::VAULT }, "id": 1 });

    let (status, value) = call_rpc(&svc.router, client(10001), None, body.clone()).await;
    assert!(status.is_success());
    assert_eq!(value["error"]["code"], RpcErrorCode::Unauthorized as i64);

    let (_, value) = call_rpc(&svc.router, client(10001), Some("wrong"), body.clone()).await;
    assert_eq!(value["error"]["code"], RpcErrorCode::Unauthorized as i64);

    let (_, value) = call_rpc(&svc.router, client(10001), Some("secret-token"), body).await;
    assert_eq!(value["result"], json!([]));
}

#[tokio::test]
async fn metrics_require_token_but_health_does_not() {
    let svc = protected();

    let (status, _) = send(&svc.router, Request::get("/metrics").body(Body::empty()).expect("request")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::get("/metrics").header("x-api-key", "secret-token").body(Body::empty()).expect("request");
    let (status, _) = send(&svc.router, request).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&svc.router, Request::get("/health").body(Body::empty()).expect("request")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}
