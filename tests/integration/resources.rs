//! Node, message and bug report endpoint integration tests
//!
//! Tests for:
//! - POST /api/db/nodes
//! - PATCH /api/db/nodes/:id
//! - POST /api/db/messages
//! - POST /api/db/bugs

use axum::http::{header, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{auth_header, constants, TestHarness};
use crate::mocks::{body_json, MockSupabaseServer};

#[tokio::test]
async fn test_create_node_stamps_owner() {
    let harness = TestHarness::authenticated().await;
    harness.supabase.mock_insert("nodes", "node-1").await;

    let response = harness
        .server
        .post("/api/db/nodes")
        .add_header(header::AUTHORIZATION, auth_header().parse().unwrap())
        .json(&json!({ "conversations_id": "conv-1", "title": "Root", "user_id": "forged" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let requests = harness.supabase.table_requests("nodes").await;
    assert_eq!(
        body_json(&requests[0]),
        json!({
            "conversations_id": "conv-1",
            "title": "Root",
            "user_id": constants::TEST_USER_ID
        })
    );

    let created: Value = response.json();
    assert_eq!(created["id"], "node-1");
    assert_eq!(created["user_id"], constants::TEST_USER_ID);
}

#[tokio::test]
async fn test_update_node_writes_only_title() {
    let harness = TestHarness::authenticated().await;
    harness.supabase.mock_update("nodes").await;

    let response = harness
        .server
        .patch("/api/db/nodes/node-1")
        .add_header(header::AUTHORIZATION, auth_header().parse().unwrap())
        .json(&json!({ "title": "Renamed", "conversations_id": "elsewhere" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({ "success": true }));

    let requests = harness.supabase.table_requests("nodes").await;
    assert_eq!(requests.len(), 1);
    assert_eq!(
        MockSupabaseServer::query_value(&requests[0], "id").as_deref(),
        Some("eq.node-1")
    );
    assert_eq!(
        body_json(&requests[0]),
        json!({ "title": "Renamed" })
    );
}

#[tokio::test]
async fn test_update_node_requires_title() {
    let harness = TestHarness::authenticated().await;
    harness.supabase.mock_update("nodes").await;

    let response = harness
        .server
        .patch("/api/db/nodes/node-1")
        .add_header(header::AUTHORIZATION, auth_header().parse().unwrap())
        .json(&json!({ "name": "wrong field" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(harness.supabase.table_requests("nodes").await.is_empty());
}

#[tokio::test]
async fn test_create_message_stamps_owner() {
    let harness = TestHarness::authenticated().await;
    harness.supabase.mock_insert("messages", "msg-1").await;

    let response = harness
        .server
        .post("/api/db/messages")
        .add_header(header::AUTHORIZATION, auth_header().parse().unwrap())
        .json(&json!({ "nodes_id": "node-1", "ordinal": 3, "role": "user", "content": "Hi" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let requests = harness.supabase.table_requests("messages").await;
    let sent = body_json(&requests[0]);
    assert_eq!(sent["user_id"], constants::TEST_USER_ID);
    assert_eq!(sent["ordinal"], 3);

    let created: Value = response.json();
    assert_eq!(created["id"], "msg-1");
    assert_eq!(created["content"], "Hi");
}

#[tokio::test]
async fn test_create_bug_report_stamps_owner() {
    let harness = TestHarness::authenticated().await;
    harness.supabase.mock_insert("bug_reports", "bug-1").await;

    let response = harness
        .server
        .post("/api/db/bugs")
        .add_header(header::AUTHORIZATION, auth_header().parse().unwrap())
        .json(&json!({ "description": "Sidebar flickers", "user_id": null }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let requests = harness.supabase.table_requests("bug_reports").await;
    assert_eq!(
        body_json(&requests[0]),
        json!({ "description": "Sidebar flickers", "user_id": constants::TEST_USER_ID })
    );
}

#[tokio::test]
async fn test_resource_routes_require_auth() {
    let harness = TestHarness::start().await;

    for path in ["/api/db/nodes", "/api/db/messages", "/api/db/bugs"] {
        let response = harness.server.post(path).json(&json!({})).await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED, "{}", path);
    }
    assert!(harness.supabase.received_requests().await.is_empty());
}
