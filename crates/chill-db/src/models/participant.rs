//! Participant database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for room_participants table
#[derive(Debug, Clone, FromRow)]
pub struct ParticipantModel {
    pub user_id: String,
    pub room_id: i64,
    pub emoji: String,
    pub status: String,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
