//! Integration tests for the chain connection using wiremock.

use ralph_core::error::StrategyError;
use ralph_strategies::{BeliefMode, BeliefStrategy, RpcClient, names, standard_strategies};
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn get_health_ok() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "jsonrpc": "2.0",
            "method": "getHealth",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jsonrpc": "2.0",
            "result": "ok",
            "id": 1,
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let rpc = RpcClient::new(mock_server.uri());
    let result = rpc.get_health().await;
    assert!(result.is_ok(), "expected Ok, got: {:?}", result.err());
}

#[tokio::test]
async fn get_health_maps_rpc_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jsonrpc": "2.0",
            "error": { "code": -32005, "message": "Node is behind by 42 slots" },
            "id": 1,
        })))
        .mount(&mock_server)
        .await;

    let rpc = RpcClient::new(mock_server.uri());
    let err = rpc.get_health().await.unwrap_err();
    assert!(matches!(&err, StrategyError::Rpc(msg) if msg.contains("behind by 42")));
}

#[tokio::test]
async fn http_error_status_is_rpc_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let rpc = RpcClient::new(mock_server.uri());
    let err = rpc.get_health().await.unwrap_err();
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn unreachable_endpoint_is_rpc_error() {
    let rpc = RpcClient::new("http://127.0.0.1:1");
    let err = rpc.get_health().await.unwrap_err();
    assert!(matches!(err, StrategyError::Rpc(_)));
}

#[tokio::test]
async fn standard_registry_keeps_order_and_never_calls_rpc() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let rpc = Arc::new(RpcClient::new(mock_server.uri()));
    let belief = Arc::new(BeliefStrategy::from_mode(BeliefMode::Fixed, 0.2));
    let registry = standard_strategies(rpc, belief);

    let keys: Vec<&str> = registry.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(
        keys,
        vec![names::YIELD, names::SIGNAL, names::LIQUIDITY, names::ZK, names::BELIEF]
    );
    for (_, strategy) in &registry {
        assert!(strategy.execute().await.unwrap().success);
    }
}
