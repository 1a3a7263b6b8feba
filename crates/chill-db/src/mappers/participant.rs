//! Participant entity <-> model mapper

use chill_core::entities::Participant;
use chill_core::value_objects::{Snowflake, UserId};

use crate::models::ParticipantModel;

impl From<ParticipantModel> for Participant {
    fn from(model: ParticipantModel) -> Self {
        Participant {
            user_id: UserId::new(model.user_id),
            room_id: Snowflake::new(model.room_id),
            emoji: model.emoji,
            status: model.status,
            joined_at: model.joined_at,
            updated_at: model.updated_at,
        }
    }
}
