use super::{call_rpc, client, service_with, ServiceOptions};
use serde_json::json;

#[tokio::test]
async fn rpc_rate_limit_enforced_per_client() {
    let svc = service_with(ServiceOptions { rate_limit_rps: 1, rate_limit_burst: 0, ..ServiceOptions::default() });
    let body = json!({ "jsonrpc": "2.0", "method": "does.not.exist", "params": {}, "id": 1 });

    let (first, _) = call_rpc(&svc.router, client(10003), None, body.clone()).await;
    assert!(first.is_success());
    let (second, _) = call_rpc(&svc.router, client(10003), None, body.clone()).await;
    assert_eq!(second.as_u16(), 429);

    let other = std::net::SocketAddr::from(([127, 0, 0, 2], 10003));
    let (third, _) = call_rpc(&svc.router, other, None, body).await;
    assert!(third.is_success());

    let text = svc.state.metrics.encode().expect("metrics");
    assert!(text.contains("rpc_rate_limited_total 1"));
}
