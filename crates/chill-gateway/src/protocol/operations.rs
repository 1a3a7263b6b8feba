//! Real-time operation names carried in the `t` field of Request frames

use std::fmt;

/// Operations a client can request over the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    RegisterConnection,
    RoomJoin,
    RoomLeave,
    RoomUpdatePresence,
    RoomSendMessage,
}

impl Operation {
    /// Wire name of the operation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RegisterConnection => "register-connection",
            Self::RoomJoin => "room-join",
            Self::RoomLeave => "room-leave",
            Self::RoomUpdatePresence => "room-update-presence",
            Self::RoomSendMessage => "room-send-message",
        }
    }

    /// Parse an operation from its wire name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "register-connection" => Some(Self::RegisterConnection),
            "room-join" => Some(Self::RoomJoin),
            "room-leave" => Some(Self::RoomLeave),
            "room-update-presence" => Some(Self::RoomUpdatePresence),
            "room-send-message" => Some(Self::RoomSendMessage),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
