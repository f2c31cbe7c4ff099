//! Auth guard integration tests
//!
//! Every /api/db/* route requires a bearer token that the identity backend
//! accepts. Rejections happen before any data request is made.

use axum::http::{header, StatusCode};
use serde_json::{json, Value};

use crate::common::{auth_header, constants, TestHarness};

#[tokio::test]
async fn test_missing_token_is_rejected_without_backend_call() {
    let harness = TestHarness::start().await;

    let response = harness.server.get("/api/db/conversations").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body, json!({ "error": "Missing authorization header" }));
    assert!(harness.supabase.received_requests().await.is_empty());
}

#[tokio::test]
async fn test_non_bearer_header_is_rejected_without_backend_call() {
    let harness = TestHarness::start().await;

    let response = harness
        .server
        .post("/api/db/conversations")
        .add_header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap())
        .json(&json!({ "title": "Test" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert!(harness.supabase.received_requests().await.is_empty());
}

#[tokio::test]
async fn test_empty_bearer_is_rejected_without_backend_call() {
    let harness = TestHarness::start().await;

    let response = harness
        .server
        .delete("/api/db/conversations/abc")
        .add_header(header::AUTHORIZATION, "Bearer ".parse().unwrap())
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert!(harness.supabase.received_requests().await.is_empty());
}

#[tokio::test]
async fn test_rejected_token_relays_identity_message() {
    let harness = TestHarness::start().await;
    harness.supabase.mock_get_user_invalid().await;

    let response = harness
        .server
        .get("/api/db/conversations")
        .add_header(header::AUTHORIZATION, auth_header().parse().unwrap())
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("invalid JWT"), "unexpected message: {}", message);

    // Only the identity lookup went out; no data request
    let requests = harness.supabase.received_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/auth/v1/user");
}

#[tokio::test]
async fn test_data_requests_carry_caller_token_and_anon_key() {
    let harness = TestHarness::authenticated().await;
    harness.supabase.mock_select("conversations", json!([])).await;

    let response = harness
        .server
        .get("/api/db/conversations")
        .add_header(header::AUTHORIZATION, auth_header().parse().unwrap())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let requests = harness.supabase.table_requests("conversations").await;
    assert_eq!(requests.len(), 1);
    let headers = &requests[0].headers;
    assert_eq!(
        headers.get("authorization").unwrap().to_str().unwrap(),
        format!("Bearer {}", constants::TEST_TOKEN)
    );
    assert_eq!(
        headers.get("apikey").unwrap().to_str().unwrap(),
        constants::ANON_KEY
    );
}

#[tokio::test]
async fn test_every_request_resolves_identity_again() {
    let harness = TestHarness::authenticated().await;
    harness.supabase.mock_select("conversations", json!([])).await;

    for _ in 0..2 {
        harness
            .server
            .get("/api/db/conversations")
            .add_header(header::AUTHORIZATION, auth_header().parse().unwrap())
            .await;
    }

    let identity_calls = harness
        .supabase
        .received_requests()
        .await
        .into_iter()
        .filter(|r| r.url.path() == "/auth/v1/user")
        .count();
    assert_eq!(identity_calls, 2);
}

#[tokio::test]
async fn test_relays_do_not_require_auth() {
    let harness = TestHarness::start().await;
    harness
        .gemini
        .mock_generate_success(canopy::config::DEFAULT_GEMINI_MODEL, &["hi"])
        .await;

    let response = harness
        .server
        .post("/api/gemini/generate")
        .json(&json!({ "prompt": "hello" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(harness.supabase.received_requests().await.is_empty());
}
