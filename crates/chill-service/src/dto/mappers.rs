//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use chill_core::entities::{Message, Participant, Room, UserSummary};

use super::responses::{MessageResponse, ParticipantResponse, RoomResponse, UserResponse};

// ============================================================================
// Helper structs carrying related data
// ============================================================================

pub struct ParticipantWithUser {
    pub participant: Participant,
    pub user: Option<UserSummary>,
}

pub struct MessageWithSender {
    pub message: Message,
    pub sender: Option<UserSummary>,
}

pub struct RoomWithParticipants {
    pub room: Room,
    pub participants: Vec<ParticipantWithUser>,
}

// ============================================================================
// Mappers
// ============================================================================

impl From<UserSummary> for UserResponse {
    fn from(user: UserSummary) -> Self {
        Self {
            id: user.id.into_inner(),
            username: user.username,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
        }
    }
}

impl From<ParticipantWithUser> for ParticipantResponse {
    fn from(details: ParticipantWithUser) -> Self {
        let p = details.participant;
        Self {
            user_id: p.user_id.into_inner(),
            room_id: p.room_id.to_string(),
            emoji: p.emoji,
            status: p.status,
            joined_at: p.joined_at,
            updated_at: p.updated_at,
            user: details.user.map(UserResponse::from),
        }
    }
}

impl From<MessageWithSender> for MessageResponse {
    fn from(details: MessageWithSender) -> Self {
        let m = details.message;
        Self {
            id: m.id.to_string(),
            room_id: m.room_id.to_string(),
            sender_id: m.sender_id.into_inner(),
            content: m.content,
            tone: m.tone,
            original_content: m.original_content,
            created_at: m.created_at,
            sender: details.sender.map(UserResponse::from),
        }
    }
}

impl From<RoomWithParticipants> for RoomResponse {
    fn from(details: RoomWithParticipants) -> Self {
        let room = details.room;
        let participants: Vec<ParticipantResponse> = details
            .participants
            .into_iter()
            .map(ParticipantResponse::from)
            .collect();

        Self {
            id: room.id.to_string(),
            name: room.name,
            category: room.category,
            active_users: room.active_users,
            participant_count: participants.len(),
            participants,
            created_at: room.created_at,
            updated_at: room.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chill_core::{Snowflake, UserId};

    #[test]
    fn test_room_mapping_counts_participants() {
        let room = Room::new(Snowflake::new(5), "Night Chill", "night");
        let participants = vec![
            ParticipantWithUser {
                participant: Participant::new(UserId::new("a"), room.id, None, None),
                user: None,
            },
            ParticipantWithUser {
                participant: Participant::new(UserId::new("b"), room.id, Some("🌙"), None),
                user: Some(UserSummary::anonymous(UserId::new("b"))),
            },
        ];

        let response = RoomResponse::from(RoomWithParticipants { room, participants });
        assert_eq!(response.id, "5");
        assert_eq!(response.participant_count, 2);
        assert_eq!(response.participants[1].emoji, "🌙");
        assert_eq!(
            response.participants[1].user.as_ref().map(|u| u.id.as_str()),
            Some("b")
        );
    }
}
