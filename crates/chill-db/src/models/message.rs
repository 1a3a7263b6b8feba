//! Message database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for room_messages table
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub room_id: i64,
    pub sender_id: String,
    pub content: String,
    pub tone: Option<String>,
    pub original_content: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MessageModel {
    #[inline]
    pub fn has_tone(&self) -> bool {
        self.tone.is_some()
    }
}
