//! API Integration Tests
//!
//! These tests require a running PostgreSQL instance and `DATABASE_URL`.
//! They skip themselves otherwise.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, check_test_env, token_for, unique_user, CreateRoom, MessageBody,
    RoomBody, TestServer,
};
use reqwest::StatusCode;
use serde_json::Value;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], true);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api-docs/openapi.json").await.unwrap();
    let doc: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(doc["paths"]["/api/v1/rooms"].is_object());
}

// ============================================================================
// Room Directory Tests
// ============================================================================

#[tokio::test]
async fn test_default_rooms_are_listed() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/v1/rooms").await.unwrap();
    let rooms: Vec<RoomBody> = assert_json(response, StatusCode::OK).await.unwrap();

    for name in ["Cozy Lo-Fi", "Deep Focus", "Night Chill"] {
        assert!(rooms.iter().any(|r| r.name == name), "missing {name}");
    }
}

#[tokio::test]
async fn test_create_and_get_room() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = CreateRoom::unique();

    let response = server.post("/api/v1/rooms", None, &request).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let token = token_for(&unique_user("creator"));
    let response = server
        .post("/api/v1/rooms", Some(&token), &request)
        .await
        .unwrap();
    let room: RoomBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(room.name, request.name);
    assert_eq!(room.category, "test");
    assert_eq!(room.active_users, 0);

    let response = server
        .post("/api/v1/rooms", Some(&token), &request)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(body["error"]["code"], "CONFLICT");

    let response = server
        .get(&format!("/api/v1/rooms/{}", room.id))
        .await
        .unwrap();
    let fetched: RoomBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(fetched.id, room.id);
    assert_eq!(fetched.participant_count, 0);
}

#[tokio::test]
async fn test_get_unknown_room() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/v1/rooms/1").await.unwrap();
    let body: Value = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body["error"]["code"], "UNKNOWN_ROOM");
}

#[tokio::test]
async fn test_create_room_validation() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = token_for(&unique_user("creator"));
    let request = CreateRoom {
        name: String::new(),
        category: "test".to_string(),
    };

    let response = server
        .post("/api/v1/rooms", Some(&token), &request)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

// ============================================================================
// Message Tests
// ============================================================================

#[tokio::test]
async fn test_new_room_has_no_messages() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = token_for(&unique_user("creator"));
    let response = server
        .post("/api/v1/rooms", Some(&token), &CreateRoom::unique())
        .await
        .unwrap();
    let room: RoomBody = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .get(&format!("/api/v1/rooms/{}/messages?limit=10", room.id))
        .await
        .unwrap();
    let messages: Vec<MessageBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(messages.is_empty());

    let response = server
        .delete_auth(&format!("/api/v1/rooms/{}/messages/1", room.id), &token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Upload Tests
// ============================================================================

#[tokio::test]
async fn test_upload_without_storage_is_unconfigured() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = token_for(&unique_user("uploader"));
    let response = server
        .upload(&token, "cat.png", "image/png", b"not-really-a-png".to_vec())
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::SERVICE_UNAVAILABLE)
        .await
        .unwrap();
    assert_eq!(body["error"]["code"], "UNCONFIGURED");
}
