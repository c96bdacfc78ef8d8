use sentinel::persistence::traits::RuleRepository;

use crate::helpers::*;

#[tokio::test]
async fn rules_endpoint_returns_empty_array() {
    let repo = create_test_repo().await;
    let server = TestServer::new(repo).await;

    let resp = server.get("/rules").await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body, serde_json::Value::Array(vec![]));

    server.cleanup();
}

#[tokio::test]
async fn rules_endpoint_returns_stored_rules() {
    let repo = create_test_repo().await;
    repo.create_rule(test_rule("Rule A", "0xaaa", "")).await.unwrap();
    repo.create_rule(test_rule("Rule B", "0xbbb", "ep_2")).await.unwrap();

    let server = TestServer::new(repo).await;
    let resp = server.get("/rules").await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    let rules = body.as_array().expect("Expected JSON array");
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0]["name"], "Rule A");
    assert_eq!(rules[1]["name"], "Rule B");
    assert_eq!(rules[1]["notusSubscriptionId"], "ep_2");

    server.cleanup();
}

#[tokio::test]
async fn create_rule_round_trips_all_fields() {
    let repo = create_test_repo().await;
    let server = TestServer::new(repo).await;

    let payload = serde_json::json!({
        "name": "Watch USDC",
        "ownerAddress": "0xOwner",
        "networkId": "ETH_SEPOLIA",
        "contractAddress": "0xAbC123",
        "eventName": "Transfer",
        "notusSubscriptionId": "ep_42"
    });

    let resp = server.post("/rules").json(&payload).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["name"], "Watch USDC");
    assert_eq!(body["ownerAddress"], "0xOwner");
    assert_eq!(body["networkId"], "ETH_SEPOLIA");
    assert_eq!(body["contractAddress"], "0xAbC123");
    assert_eq!(body["eventName"], "Transfer");
    assert_eq!(body["notusSubscriptionId"], "ep_42");
    assert!(body["id"].as_i64().unwrap() > 0);
    assert!(body["createdAt"].is_string());

    // The stored rule is visible through the collection endpoint.
    let resp = server.get("/rules").await;
    let rules: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(rules.as_array().unwrap().len(), 1);

    server.cleanup();
}

#[tokio::test]
async fn create_rule_without_subscription_id_defaults_to_empty() {
    let repo = create_test_repo().await;
    let server = TestServer::new(repo).await;

    let payload = serde_json::json!({
        "name": "Watch USDC",
        "ownerAddress": "0xOwner",
        "networkId": "ETH_SEPOLIA",
        "contractAddress": "0xAbC123",
        "eventName": "Transfer"
    });

    let resp = server.post("/rules").json(&payload).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["notusSubscriptionId"], "");

    server.cleanup();
}

#[tokio::test]
async fn create_rule_rejects_missing_required_field() {
    let repo = create_test_repo().await;
    let server = TestServer::new(repo).await;

    // eventName is missing.
    let payload = serde_json::json!({
        "name": "Watch USDC",
        "ownerAddress": "0xOwner",
        "networkId": "ETH_SEPOLIA",
        "contractAddress": "0xAbC123"
    });

    let resp = server.post("/rules").json(&payload).send().await.unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "All fields are required.");

    // Nothing was stored.
    let resp = server.get("/rules").await;
    let rules: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(rules, serde_json::Value::Array(vec![]));

    server.cleanup();
}

#[tokio::test]
async fn rules_endpoint_handles_db_error() {
    let repo = create_test_repo_without_migrations().await;
    let server = TestServer::new(repo).await;

    let resp = server.get("/rules").await;
    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "An internal server error occurred");

    server.cleanup();
}
