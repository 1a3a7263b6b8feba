//! Message entity - a chat line posted into a room

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::{Snowflake, UserId};

/// Maximum message length in characters
pub const MAX_CONTENT_LENGTH: usize = 2000;

/// Message entity
///
/// When a tone was applied, `content` holds the rewritten text and
/// `original_content` the text the sender actually typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub room_id: Snowflake,
    pub sender_id: UserId,
    pub content: String,
    pub tone: Option<String>,
    pub original_content: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new Message without a tone
    pub fn new(id: Snowflake, room_id: Snowflake, sender_id: UserId, content: String) -> Self {
        Self {
            id,
            room_id,
            sender_id,
            content,
            tone: None,
            original_content: None,
            created_at: Utc::now(),
        }
    }

    /// Create a Message whose content was rewritten in `tone`
    pub fn with_tone(
        id: Snowflake,
        room_id: Snowflake,
        sender_id: UserId,
        original: String,
        rewritten: String,
        tone: String,
    ) -> Self {
        Self {
            tone: Some(tone),
            original_content: Some(original),
            ..Self::new(id, room_id, sender_id, rewritten)
        }
    }

    /// Check if `user_id` posted this message
    #[inline]
    pub fn is_sent_by(&self, user_id: &UserId) -> bool {
        &self.sender_id == user_id
    }

    #[inline]
    pub fn has_tone(&self) -> bool {
        self.tone.is_some()
    }

    /// Validate raw message content before it is stored
    pub fn validate_content(content: &str) -> Result<(), DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Message content cannot be empty".to_string(),
            ));
        }
        if content.chars().count() > MAX_CONTENT_LENGTH {
            return Err(DomainError::ContentTooLong {
                max: MAX_CONTENT_LENGTH,
            });
        }
        Ok(())
    }
}
