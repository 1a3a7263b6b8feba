//! Payload definitions
//!
//! Request payloads sent by clients and the acknowledgements returned to them.

use chill_core::{Snowflake, UserId};
use chill_service::dto::{JoinRoomResponse, MessageResponse, ParticipantResponse, RoomResponse};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// ============================================================================
// Server payloads
// ============================================================================

/// Payload for op 10 (Hello)
///
/// Sent by the server immediately after connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

impl HelloPayload {
    /// Default heartbeat interval (45 seconds)
    pub const DEFAULT_HEARTBEAT_INTERVAL: u64 = 45_000;

    #[must_use]
    pub fn new() -> Self {
        Self::with_interval(Self::DEFAULT_HEARTBEAT_INTERVAL)
    }

    #[must_use]
    pub fn with_interval(heartbeat_interval: u64) -> Self {
        Self { heartbeat_interval }
    }
}

impl Default for HelloPayload {
    fn default() -> Self {
        Self::new()
    }
}

impl From<HelloPayload> for Value {
    fn from(payload: HelloPayload) -> Self {
        json!({ "heartbeat_interval": payload.heartbeat_interval })
    }
}

// ============================================================================
// Request payloads (op 2)
// ============================================================================

/// `register-connection`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterConnectionPayload {
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Bearer token, verified when present
    #[serde(default)]
    pub token: Option<String>,
}

/// `room-join` and `room-update-presence`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPresencePayload {
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub room_id: Snowflake,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// `room-leave`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomLeavePayload {
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub room_id: Snowflake,
}

/// `room-send-message`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub room_id: Snowflake,
    pub content: String,
    #[serde(default)]
    pub tone: Option<String>,
}

// ============================================================================
// Acknowledgements (op 3)
// ============================================================================

/// `{ "success": true }`
#[derive(Debug, Clone, Serialize)]
pub struct SuccessAck {
    pub success: bool,
}

impl SuccessAck {
    #[must_use]
    pub fn new() -> Self {
        Self { success: true }
    }
}

impl Default for SuccessAck {
    fn default() -> Self {
        Self::new()
    }
}

/// `{ "success": true, "room": ..., "messages": [...] }`
#[derive(Debug, Clone, Serialize)]
pub struct JoinAck {
    pub success: bool,
    pub room: RoomResponse,
    pub messages: Vec<MessageResponse>,
}

impl From<JoinRoomResponse> for JoinAck {
    fn from(snapshot: JoinRoomResponse) -> Self {
        Self {
            success: true,
            room: snapshot.room,
            messages: snapshot.messages,
        }
    }
}

/// `{ "success": true, "participant": ... }`
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantAck {
    pub success: bool,
    pub participant: ParticipantResponse,
}

/// `{ "success": true, "message": ... }`
#[derive(Debug, Clone, Serialize)]
pub struct MessageAck {
    pub success: bool,
    pub message: MessageResponse,
}

/// `{ "success": false, "error": "..." }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorAck {
    pub success: bool,
    pub error: String,
}

impl ErrorAck {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
