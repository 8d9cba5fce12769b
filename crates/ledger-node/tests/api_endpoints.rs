use axum_test::TestServer;
use ledger_core::{Chain, Transfer};
use ledger_node::{error::ApiError, router, LedgerService};
use serde_json::{json, Value};
use std::time::Duration;

fn test_server() -> (TestServer, LedgerService) {
    let chain = Chain::new(1).expect("Failed to create chain");
    let service = LedgerService::new(chain, None);
    let server = TestServer::new(router(service.clone())).expect("Failed to create test server");
    (server, service)
}

#[tokio::test]
async fn test_health() {
    let (server, _) = test_server();
    let response = server.get("/health").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "ledger-node");
}

#[tokio::test]
async fn test_transfer_then_chain() {
    let (server, _) = test_server();

    let response = server
        .post("/transfer")
        .json(&json!({ "from": "alice", "to": "bob", "amount": 25 }))
        .await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["message"], "Transfer completed successfully");
    assert_eq!(json["from"], "alice");
    assert_eq!(json["to"], "bob");
    assert_eq!(json["amount"], 25);
    assert_eq!(json["block_index"], 1);

    let response = server.get("/chain").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["length"], 2);
    assert_eq!(json["is_valid"], true);
    assert_eq!(json["difficulty"], 1);
    let blocks = json["chain"].as_array().expect("chain is an array");
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0]["payload"], "Genesis Block");
    assert_eq!(blocks[0]["previous_digest"], "0");
    assert_eq!(blocks[1]["payload"], "Transfer from alice to bob: 25 coins");
    assert_eq!(blocks[1]["previous_digest"], blocks[0]["digest"]);
    assert!(blocks[1]["nonce"].is_number());
    assert!(blocks[1]["timestamp"].is_number());
}

#[tokio::test]
async fn test_transfer_rejects_invalid_input() {
    let (server, service) = test_server();

    let response = server
        .post("/transfer")
        .json(&json!({ "from": "", "to": "bob", "amount": 5 }))
        .await;
    assert_eq!(response.status_code(), 400);
    let json: Value = response.json();
    assert_eq!(json["error"], "from, to, and amount (>0) are required");

    let response = server
        .post("/transfer")
        .json(&json!({ "from": "alice", "to": "bob", "amount": 0 }))
        .await;
    assert_eq!(response.status_code(), 400);

    let response = server
        .post("/transfer")
        .json(&json!({ "from": "alice" }))
        .await;
    assert_eq!(response.status_code(), 400);
    let json: Value = response.json();
    assert_eq!(json["error"], "Invalid request format");

    assert_eq!(service.snapshot().await.length, 1);
}

#[tokio::test]
async fn test_balance_ignores_transfer_payloads() {
    let (server, _) = test_server();
    server
        .post("/transfer")
        .json(&json!({ "from": "alice", "to": "bob", "amount": 10 }))
        .await;

    let response = server.get("/balance/bob").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["address"], "bob");
    assert_eq!(json["balance"], 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_transfers_are_serialized() -> anyhow::Result<()> {
    let service = LedgerService::new(Chain::new(2)?, Some(Duration::from_secs(60)));
    let mut handles = Vec::new();
    for i in 0..8u64 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .transfer(&Transfer::new(format!("user{i}"), "sink", i + 1))
                .await
        }));
    }

    let mut indices = Vec::new();
    for handle in handles {
        indices.push(handle.await??);
    }
    indices.sort_unstable();
    assert_eq!(indices, (1..=8).collect::<Vec<u64>>());

    let snapshot = service.snapshot().await;
    assert_eq!(snapshot.length, 9);
    assert!(snapshot.is_valid);
    Ok(())
}

#[tokio::test]
async fn test_mining_timeout_cancels_and_keeps_chain() -> anyhow::Result<()> {
    let service = LedgerService::new(Chain::new(5)?, Some(Duration::ZERO));

    let err = service
        .transfer(&Transfer::new("alice", "bob", 5))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::MiningTimeout(_)));
    assert!(err.to_string().starts_with("mining of block 1 cancelled after"));

    let snapshot = service.snapshot().await;
    assert_eq!(snapshot.length, 1);
    assert!(snapshot.is_valid);

    let server = TestServer::new(router(service.clone())).expect("Failed to create test server");
    let response = server
        .post("/transfer")
        .json(&json!({ "from": "alice", "to": "bob", "amount": 5 }))
        .await;
    assert_eq!(response.status_code(), 503);
    let json: Value = response.json();
    assert!(json["error"].as_str().unwrap_or_default().contains("cancelled"));
    assert_eq!(service.snapshot().await.length, 1);
    Ok(())
}
