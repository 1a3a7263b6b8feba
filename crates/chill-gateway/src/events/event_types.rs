//! Gateway event types
//!
//! Defines the event names used in the `t` field of dispatch frames.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Gateway event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GatewayEventType {
    // Connection registry events
    /// A connection registered a user
    UserOnline,
    /// A registered connection closed
    UserOffline,

    // Room presence events
    /// A user joined a room
    ParticipantJoined,
    /// A user left a room
    ParticipantLeft,
    /// A participant changed emoji or status
    ParticipantUpdated,

    // Chat events
    /// A message was posted to a room
    NewMessage,
}

impl GatewayEventType {
    /// Get the string representation of the event type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserOnline => "user-online",
            Self::UserOffline => "user-offline",
            Self::ParticipantJoined => "participant-joined",
            Self::ParticipantLeft => "participant-left",
            Self::ParticipantUpdated => "participant-updated",
            Self::NewMessage => "new-message",
        }
    }

    /// Parse an event type from a string
    #[must_use]
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "user-online" => Some(Self::UserOnline),
            "user-offline" => Some(Self::UserOffline),
            "participant-joined" => Some(Self::ParticipantJoined),
            "participant-left" => Some(Self::ParticipantLeft),
            "participant-updated" => Some(Self::ParticipantUpdated),
            "new-message" => Some(Self::NewMessage),
            _ => None,
        }
    }
}

impl fmt::Display for GatewayEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<GatewayEventType> for String {
    fn from(event: GatewayEventType) -> Self {
        event.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_names() {
        assert_eq!(GatewayEventType::NewMessage.as_str(), "new-message");
        assert_eq!(
            GatewayEventType::from_name("participant-left"),
            Some(GatewayEventType::ParticipantLeft)
        );
        assert_eq!(GatewayEventType::from_name("MESSAGE_CREATE"), None);
    }

    #[test]
    fn test_event_type_serialization_matches_as_str() {
        let json = serde_json::to_string(&GatewayEventType::ParticipantUpdated).unwrap();
        assert_eq!(json, "\"participant-updated\"");
        let json = serde_json::to_string(&GatewayEventType::UserOffline).unwrap();
        assert_eq!(json, "\"user-offline\"");
    }
}
