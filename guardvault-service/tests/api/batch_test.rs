use super::{call_rpc, client, service, VAULT};
use guardvault_service::api::RpcErrorCode;
use serde_json::json;

#[tokio::test]
async fn rpc_batch_returns_array_in_order() {
    let svc = service();
    let body = json!([
        { "jsonrpc": "2.0", "method": "withdrawal.list_by_vault", "params": { "vault": VAULT }, "id": 1 },
        { "jsonrpc": "2.0", "method": "does.not.exist", "params": {}, "id": 2 },
        { "not": "a request" }
    ]);

    let (status, value) = call_rpc(&svc.router, client(10002), None, body).await;
    assert!(status.is_success());
    let arr = value.as_array().expect("array response");
    assert_eq!(arr.len(), 3);
    assert_eq!(arr[0]["id"], 1);
    assert_eq!(arr[0]["result"], json!([]));
    assert_eq!(arr[1]["error"]["code"], RpcErrorCode::MethodNotFound as i64);
    assert_eq!(arr[2]["error"]["code"], RpcErrorCode::InvalidRequest as i64);
}

#[tokio::test]
async fn empty_batch_and_bad_version_are_invalid_requests() {
    let svc = service();
    let (_, value) = call_rpc(&svc.router, client(10002), None, json!([])).await;
    assert_eq!(value["error"]["code"], RpcErrorCode::InvalidRequest as i64);

    let (_, value) =
        call_rpc(&svc.router, client(10002), None, json!({ "jsonrpc": "1.0", "method": "withdrawal.get", "params": {}, "id": 9 })).await;
    assert_eq!(value["id"], 9);
    assert_eq!(value["error"]["code"], RpcErrorCode::InvalidRequest as i64);
}

#[tokio::test]
async fn malformed_params_are_invalid_params() {
    let svc = service();
    let value = super::rpc(&svc.router, "withdrawal.get", json!({ "id": "wrong-field" })).await;
    assert_eq!(value["error"]["code"], RpcErrorCode::InvalidParams as i64);

    let (_, value) = call_rpc(&svc.router, client(10002), None, json!({ "jsonrpc": "2.0", "method": "withdrawal.get", "id": 3 })).await;
    assert_eq!(value["error"]["code"], RpcErrorCode::InvalidParams as i64);
}
