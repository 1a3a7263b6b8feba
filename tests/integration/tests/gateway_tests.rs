//! Gateway Integration Tests
//!
//! Drive the WebSocket gateway end to end against PostgreSQL.
//! Skipped unless `DATABASE_URL` is set.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use chill_service::dto::CreateRoomRequest;
use chill_service::RoomService;
use integration_tests::{
    check_test_env, presence, unique_user, CreateRoom, MessageBody, ParticipantBody, RoomBody,
    TestGateway,
};
use serde_json::{json, Value};

async fn create_room(gateway: &TestGateway) -> String {
    let CreateRoom { name, category } = CreateRoom::unique();
    RoomService::new(gateway.state.service_context())
        .create_room(CreateRoomRequest { name, category })
        .await
        .expect("Failed to create room")
        .id
}

#[tokio::test]
async fn test_hello_and_heartbeat() {
    if !check_test_env() {
        return;
    }

    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let mut client = gateway.connect().await.unwrap();
    assert_eq!(client.heartbeat_interval, 45_000);

    client.heartbeat().await.unwrap();
}

#[tokio::test]
async fn test_presence_and_chat_scenario() {
    if !check_test_env() {
        return;
    }

    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let room_id = create_room(&gateway).await;
    let u1 = unique_user("u1");
    let u2 = unique_user("u2");

    let mut c1 = gateway.connect().await.unwrap();
    let mut c2 = gateway.connect().await.unwrap();

    let ack = c1
        .request("register-connection", json!({ "userId": u1 }))
        .await
        .unwrap();
    assert_eq!(ack["success"], true);
    let online = c2.next_event("user-online").await.unwrap();
    assert_eq!(online["userId"], u1.as_str());

    // u1 joins with emoji and status
    let ack = c1
        .request(
            "room-join",
            presence(&u1, &room_id, Some("🎵"), Some("focus")),
        )
        .await
        .unwrap();
    let room: RoomBody = serde_json::from_value(ack["room"].clone()).unwrap();
    assert_eq!(room.active_users, 1);

    // Rejoining without fields keeps them and does not duplicate the row
    let ack = c1
        .request("room-join", presence(&u1, &room_id, None, None))
        .await
        .unwrap();
    let room: RoomBody = serde_json::from_value(ack["room"].clone()).unwrap();
    assert_eq!(room.active_users, 1);
    assert_eq!(room.participants.len(), 1);
    let p: &ParticipantBody = &room.participants[0];
    assert_eq!(p.emoji.as_deref(), Some("🎵"));
    assert_eq!(p.status.as_deref(), Some("focus"));
    assert_eq!(p.room_id, room_id);

    // u2 joins and u1 sees it
    c2.request("room-join", presence(&u2, &room_id, None, None))
        .await
        .unwrap();
    let joined = c1.next_event("participant-joined").await.unwrap();
    assert_eq!(joined["participant"]["userId"], u2.as_str());

    // Plain message reaches both, sender included
    let ack = c1
        .request(
            "room-send-message",
            json!({ "userId": u1, "roomId": room_id, "content": "hello" }),
        )
        .await
        .unwrap();
    let sent: MessageBody = serde_json::from_value(ack["message"].clone()).unwrap();
    assert_eq!(sent.content, "hello");
    assert!(sent.tone.is_none());
    assert!(sent.original_content.is_none());

    for client in [&mut c1, &mut c2] {
        let event = client.next_event("new-message").await.unwrap();
        assert_eq!(event["message"]["id"], sent.id.as_str());
        assert_eq!(event["message"]["senderId"], u1.as_str());
    }

    // Leaving twice succeeds
    for _ in 0..2 {
        let ack = c2
            .request("room-leave", json!({ "userId": u2, "roomId": room_id }))
            .await
            .unwrap();
        assert_eq!(ack["success"], true);
    }
    let left = c1.next_event("participant-left").await.unwrap();
    assert_eq!(left["userId"], u2.as_str());

    let room = RoomService::new(gateway.state.service_context())
        .get_room(room_id.parse().unwrap())
        .await
        .unwrap();
    assert_eq!(room.active_users, 1);
}

#[tokio::test]
async fn test_join_missing_room_keeps_connection_open() {
    if !check_test_env() {
        return;
    }

    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let mut client = gateway.connect().await.unwrap();

    let ack = client
        .request("room-join", presence(&unique_user("u"), "1", None, None))
        .await
        .unwrap();
    assert_eq!(ack["success"], false);
    assert_eq!(ack["error"], "Room not found: 1");

    client.heartbeat().await.unwrap();
}

#[tokio::test]
async fn test_disconnect_leaves_rooms_and_goes_offline() {
    if !check_test_env() {
        return;
    }

    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let room_id = create_room(&gateway).await;
    let u1 = unique_user("u1");
    let u2 = unique_user("u2");

    let mut c1 = gateway.connect().await.unwrap();
    let mut c2 = gateway.connect().await.unwrap();
    c1.request("register-connection", json!({ "userId": u1 }))
        .await
        .unwrap();
    c1.request("room-join", presence(&u1, &room_id, None, None))
        .await
        .unwrap();
    c2.request("room-join", presence(&u2, &room_id, None, None))
        .await
        .unwrap();

    c1.close().await.unwrap();

    let left: Value = c2.next_event("participant-left").await.unwrap();
    assert_eq!(left["userId"], u1.as_str());
    let offline = c2.next_event("user-offline").await.unwrap();
    assert_eq!(offline["userId"], u1.as_str());

    let room = RoomService::new(gateway.state.service_context())
        .get_room(room_id.parse().unwrap())
        .await
        .unwrap();
    assert_eq!(room.active_users, 1);
}

#[tokio::test]
async fn test_malformed_frame_closes_with_decode_error() {
    if !check_test_env() {
        return;
    }

    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let mut client = gateway.connect().await.unwrap();

    client.send(json!("not a frame")).await.unwrap();
    assert_eq!(client.expect_close().await.unwrap(), Some(4002));
}
