//! Path parameter extractors
//!
//! Ids arrive as strings and are parsed into snowflakes here, so a bad id is
//! a 400 rather than a 404.

use chill_core::Snowflake;
use serde::Deserialize;

use crate::response::ApiError;

/// `/rooms/:room_id`
#[derive(Debug, Deserialize)]
pub struct RoomPath {
    pub room_id: String,
}

impl RoomPath {
    /// Parse room_id as Snowflake
    pub fn room_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.room_id, "room_id")
    }
}

/// `/rooms/:room_id/messages/:message_id`
#[derive(Debug, Deserialize)]
pub struct RoomMessagePath {
    pub room_id: String,
    pub message_id: String,
}

impl RoomMessagePath {
    /// Parse room_id as Snowflake
    pub fn room_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.room_id, "room_id")
    }

    /// Parse message_id as Snowflake
    pub fn message_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.message_id, "message_id")
    }
}

fn parse_id(raw: &str, name: &str) -> Result<Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_room_message_path() {
        let path = RoomMessagePath {
            room_id: "42".to_string(),
            message_id: "abc".to_string(),
        };
        assert_eq!(path.room_id().unwrap(), Snowflake::new(42));

        let err = path.message_id().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PATH_PARAMETER");
        assert_eq!(
            err.to_string(),
            "Invalid path parameter: Invalid message_id format"
        );
    }
}
