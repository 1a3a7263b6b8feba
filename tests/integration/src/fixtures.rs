//! Test fixtures and data generators

use chill_common::JwtService;
use chill_core::UserId;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Secret used to sign test tokens
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// A user id that no other test run shares
pub fn unique_user(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}

/// Bearer token for `user`
pub fn token_for(user: &str) -> String {
    JwtService::new(TEST_JWT_SECRET, 3600)
        .issue_token(&UserId::new(user))
        .unwrap_or_default()
}

/// `POST /api/v1/rooms` body
#[derive(Debug, Serialize)]
pub struct CreateRoom {
    pub name: String,
    pub category: String,
}

impl CreateRoom {
    /// A room with a name no other test run shares
    pub fn unique() -> Self {
        Self {
            name: format!("Test Room {}", uuid::Uuid::new_v4().simple()),
            category: "test".to_string(),
        }
    }
}

/// Room as returned by the API and in join acks
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomBody {
    pub id: String,
    pub name: String,
    pub category: String,
    pub active_users: i32,
    pub participant_count: usize,
    #[serde(default)]
    pub participants: Vec<ParticipantBody>,
}

/// Participant row
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantBody {
    pub user_id: String,
    pub room_id: String,
    pub emoji: Option<String>,
    pub status: Option<String>,
}

/// Chat message
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBody {
    pub id: String,
    pub room_id: String,
    pub sender_id: String,
    pub content: String,
    pub tone: Option<String>,
    pub original_content: Option<String>,
}

/// `room-join` / `room-update-presence` payload
pub fn presence(user: &str, room_id: &str, emoji: Option<&str>, status: Option<&str>) -> Value {
    let mut d = json!({ "userId": user, "roomId": room_id });
    if let Some(emoji) = emoji {
        d["emoji"] = json!(emoji);
    }
    if let Some(status) = status {
        d["status"] = json!(status);
    }
    d
}
