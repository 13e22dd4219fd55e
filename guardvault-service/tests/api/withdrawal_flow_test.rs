use super::{rpc, sample_request, service, CREATOR, VAULT};
use guardvault_service::api::RpcErrorCode;
use serde_json::{json, Value};

fn request_id(value: &Value) -> String {
    value["result"]["id"].as_str().expect("request id").to_string()
}

#[tokio::test]
async fn two_of_three_withdrawal_over_rpc() {
    let svc = service();
    let request = sample_request();

    let created = rpc(&svc.router, "withdrawal.create", json!({ "vault": VAULT, "request": request, "quorum": 2, "creator": CREATOR })).await;
    assert_eq!(created["result"]["status"], "pending");
    assert_eq!(created["result"]["request"]["amount"], "1000");
    assert_eq!(created["result"]["request"]["nonce"], "5");
    assert!(created["result"]["payload_hash"].as_str().expect("hash").starts_with("0x"));
    let id = request_id(&created);

    let a = rpc(&svc.router, "withdrawal.sign", json!({ "request_id": id, "signed": svc.guardians[0].sign(&request) })).await;
    assert_eq!(a["result"]["status"], "pending");
    assert_eq!(a["result"]["signature_count"], 1);

    let early = rpc(&svc.router, "withdrawal.execute", json!({ "request_id": id, "tx_hash": format!("0x{}", "de".repeat(32)) })).await;
    assert_eq!(early["error"]["code"], RpcErrorCode::QuorumNotMet as i64);
    assert_eq!(early["error"]["data"]["retryable"], false);

    let b = rpc(&svc.router, "withdrawal.sign", json!({ "request_id": id, "signed": svc.guardians[1].sign(&request) })).await;
    assert_eq!(b["result"]["status"], "approved");

    let quorum = rpc(&svc.router, "withdrawal.quorum", json!({ "request_id": id })).await;
    assert_eq!(quorum["result"]["count"], 2);
    assert_eq!(quorum["result"]["met"], true);

    let executed = rpc(&svc.router, "withdrawal.execute", json!({ "request_id": id, "tx_hash": format!("0x{}", "de".repeat(32)) })).await;
    assert_eq!(executed["result"]["status"], "executed");

    let late = rpc(&svc.router, "withdrawal.sign", json!({ "request_id": id, "signed": svc.guardians[2].sign(&request) })).await;
    assert_eq!(late["error"]["code"], RpcErrorCode::RequestClosed as i64);

    let activity = rpc(&svc.router, "activity.list_by_account", json!({ "account": svc.guardians[1].address })).await;
    let entries = activity["result"].as_array().expect("activities");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["request_id"], Value::String(id));

    let snapshot = svc.state.metrics.snapshot();
    assert_eq!((snapshot.requests_created, snapshot.approvals), (1, 1));
}

#[tokio::test]
async fn coordinator_errors_surface_with_their_own_codes() {
    let svc = service();
    let request = sample_request();
    let params = json!({ "vault": VAULT, "request": request, "quorum": 2, "creator": CREATOR });
    let id = request_id(&rpc(&svc.router, "withdrawal.create", params.clone()).await);

    let dup = rpc(&svc.router, "withdrawal.create", params).await;
    assert_eq!(dup["error"]["code"], RpcErrorCode::DuplicateNonce as i64);

    let missing = rpc(&svc.router, "withdrawal.get", json!({ "request_id": "no-such-request" })).await;
    assert_eq!(missing["error"]["code"], RpcErrorCode::NotFound as i64);

    let mut forged = svc.guardians[0].sign(&request);
    forged.signer = svc.guardians[1].address;
    let bad = rpc(&svc.router, "withdrawal.sign", json!({ "request_id": id, "signed": forged })).await;
    assert_eq!(bad["error"]["code"], RpcErrorCode::InvalidSignature as i64);

    let outsider = super::TestGuardian::from_seed(0xD4);
    let refused = rpc(&svc.router, "withdrawal.sign", json!({ "request_id": id, "signed": outsider.sign(&request) })).await;
    assert_eq!(refused["error"]["code"], RpcErrorCode::NotAGuardian as i64);

    rpc(&svc.router, "withdrawal.sign", json!({ "request_id": id, "signed": svc.guardians[0].sign(&request) })).await;
    let blocked = rpc(&svc.router, "withdrawal.delete", json!({ "request_id": id, "actor": CREATOR })).await;
    assert_eq!(blocked["error"]["code"], RpcErrorCode::InvalidTransition as i64);

    let rejected = rpc(&svc.router, "withdrawal.reject", json!({ "request_id": id, "actor": CREATOR })).await;
    assert_eq!(rejected["result"]["status"], "rejected");

    let invalid = rpc(
        &svc.router,
        "withdrawal.create",
        json!({ "vault": VAULT, "request": request, "quorum": 0, "creator": CREATOR }),
    )
    .await;
    assert_eq!(invalid["error"]["code"], RpcErrorCode::RequestInvalid as i64);
}

#[tokio::test]
async fn unsigned_request_can_be_deleted() {
    let svc = service();
    let created =
        rpc(&svc.router, "withdrawal.create", json!({ "vault": VAULT, "request": sample_request(), "quorum": 1, "creator": CREATOR })).await;
    let id = request_id(&created);

    let deleted = rpc(&svc.router, "withdrawal.delete", json!({ "request_id": id, "actor": CREATOR })).await;
    assert_eq!(deleted["result"]["deleted"], true);

    let listed = rpc(&svc.router, "withdrawal.list_by_vault", json!({ "vault": VAULT })).await;
    assert_eq!(listed["result"], json!([]));
}
