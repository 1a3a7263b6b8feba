//! Room entity - a named real-time space with a live participant roster

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Room entity
///
/// `active_users` is a cached, derived value. It always mirrors the number of
/// participant rows for the room and is only ever written by recounting them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: Snowflake,
    pub name: String,
    pub category: String,
    pub active_users: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    /// Maximum length of a room name
    pub const MAX_NAME_LENGTH: usize = 64;

    /// Maximum length of a category tag
    pub const MAX_CATEGORY_LENGTH: usize = 32;

    /// Create a new, empty Room
    pub fn new(id: Snowflake, name: impl Into<String>, category: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            category: category.into(),
            active_users: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if nobody is present in the room
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.active_users == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_creation() {
        let room = Room::new(Snowflake::new(1), "Cozy Lo-Fi", "lo-fi");
        assert_eq!(room.name, "Cozy Lo-Fi");
        assert_eq!(room.category, "lo-fi");
        assert_eq!(room.active_users, 0);
        assert!(room.is_empty());
        assert_eq!(room.created_at, room.updated_at);
    }
}
