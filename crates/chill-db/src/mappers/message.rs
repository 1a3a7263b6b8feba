//! Message entity <-> model mapper

use chill_core::entities::Message;
use chill_core::value_objects::{Snowflake, UserId};

use crate::models::MessageModel;

impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: Snowflake::new(model.id),
            room_id: Snowflake::new(model.room_id),
            sender_id: UserId::new(model.sender_id),
            content: model.content,
            tone: model.tone,
            original_content: model.original_content,
            created_at: model.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_model_to_entity() {
        let model = MessageModel {
            id: 10,
            room_id: 20,
            sender_id: "u1".to_string(),
            content: "hey there".to_string(),
            tone: Some("cozy".to_string()),
            original_content: Some("hey".to_string()),
            created_at: Utc::now(),
        };
        assert!(model.has_tone());

        let message = Message::from(model);
        assert_eq!(message.id, Snowflake::new(10));
        assert_eq!(message.room_id, Snowflake::new(20));
        assert!(message.is_sent_by(&UserId::new("u1")));
        assert_eq!(message.original_content.as_deref(), Some("hey"));
    }
}
