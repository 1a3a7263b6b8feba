//! Room entity <-> model mapper

use chill_core::entities::Room;
use chill_core::value_objects::Snowflake;

use crate::models::RoomModel;

impl From<RoomModel> for Room {
    fn from(model: RoomModel) -> Self {
        Room {
            id: Snowflake::new(model.id),
            name: model.name,
            category: model.category,
            active_users: model.active_users,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
