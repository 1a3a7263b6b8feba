//! Event payload definitions
//!
//! Defines the data carried by each dispatch event.

use chill_core::{Snowflake, UserId};
use chill_service::dto::{MessageResponse, ParticipantResponse};
use serde::Serialize;
use serde_json::Value;

use super::GatewayEventType;

/// `user-online` / `user-offline`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPresenceEvent {
    pub user_id: UserId,
}

/// `participant-joined` / `participant-updated`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantEvent {
    pub participant: ParticipantResponse,
    pub room_id: Snowflake,
}

/// `participant-left`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantLeftEvent {
    pub user_id: UserId,
    pub room_id: Snowflake,
}

/// `new-message`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessageEvent {
    pub message: MessageResponse,
    pub room_id: Snowflake,
}

/// A broadcast event with its payload
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    UserOnline(UserPresenceEvent),
    UserOffline(UserPresenceEvent),
    ParticipantJoined(ParticipantEvent),
    ParticipantLeft(ParticipantLeftEvent),
    ParticipantUpdated(ParticipantEvent),
    NewMessage(NewMessageEvent),
}

impl GatewayEvent {
    pub fn user_online(user_id: UserId) -> Self {
        Self::UserOnline(UserPresenceEvent { user_id })
    }

    pub fn user_offline(user_id: UserId) -> Self {
        Self::UserOffline(UserPresenceEvent { user_id })
    }

    pub fn participant_joined(participant: ParticipantResponse, room_id: Snowflake) -> Self {
        Self::ParticipantJoined(ParticipantEvent {
            participant,
            room_id,
        })
    }

    pub fn participant_left(user_id: UserId, room_id: Snowflake) -> Self {
        Self::ParticipantLeft(ParticipantLeftEvent { user_id, room_id })
    }

    pub fn participant_updated(participant: ParticipantResponse, room_id: Snowflake) -> Self {
        Self::ParticipantUpdated(ParticipantEvent {
            participant,
            room_id,
        })
    }

    pub fn new_message(message: MessageResponse, room_id: Snowflake) -> Self {
        Self::NewMessage(NewMessageEvent { message, room_id })
    }

    /// Event name for the dispatch frame
    pub fn event_type(&self) -> GatewayEventType {
        match self {
            Self::UserOnline(_) => GatewayEventType::UserOnline,
            Self::UserOffline(_) => GatewayEventType::UserOffline,
            Self::ParticipantJoined(_) => GatewayEventType::ParticipantJoined,
            Self::ParticipantLeft(_) => GatewayEventType::ParticipantLeft,
            Self::ParticipantUpdated(_) => GatewayEventType::ParticipantUpdated,
            Self::NewMessage(_) => GatewayEventType::NewMessage,
        }
    }

    /// Serialize the payload for the `d` field
    pub fn to_data(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::UserOnline(e) | Self::UserOffline(e) => serde_json::to_value(e),
            Self::ParticipantJoined(e) | Self::ParticipantUpdated(e) => serde_json::to_value(e),
            Self::ParticipantLeft(e) => serde_json::to_value(e),
            Self::NewMessage(e) => serde_json::to_value(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_events() {
        let event = GatewayEvent::user_offline(UserId::new("u1"));
        assert_eq!(event.event_type(), GatewayEventType::UserOffline);
        assert_eq!(event.to_data().unwrap(), json!({"userId": "u1"}));
    }

    #[test]
    fn test_participant_left_serializes_room_id_as_string() {
        let event = GatewayEvent::participant_left(UserId::new("u1"), Snowflake::new(42));
        assert_eq!(
            event.to_data().unwrap(),
            json!({"userId": "u1", "roomId": "42"})
        );
    }
}
