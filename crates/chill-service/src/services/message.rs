//! Message service
//!
//! Handles posting, listing and deleting chat messages in rooms.

use chill_core::entities::Message;
use chill_core::{DomainError, Snowflake, UserId};
use tracing::{info, instrument, warn};

use crate::dto::{MessageResponse, MessageWithSender};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::room::RoomService;

/// Default page size for message history
pub const DEFAULT_MESSAGE_LIMIT: i64 = 50;

/// Largest page size for message history
pub const MAX_MESSAGE_LIMIT: i64 = 100;

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Post a message to a room.
    ///
    /// A non-blank `tone` stores the content as typed in `original_content`
    /// and the tone-transformed text in `content`.
    #[instrument(skip(self, content))]
    pub async fn post_message(
        &self,
        sender_id: &UserId,
        room_id: Snowflake,
        content: &str,
        tone: Option<&str>,
    ) -> ServiceResult<MessageResponse> {
        Message::validate_content(content)?;
        RoomService::new(self.ctx).require_room(room_id).await?;

        let message_id = self.ctx.generate_id();
        let message = match tone.map(str::trim).filter(|t| !t.is_empty()) {
            Some(tone) => {
                let rewritten = self.ctx.tone_transformer().transform(content, tone).await?;
                Message::with_tone(
                    message_id,
                    room_id,
                    sender_id.clone(),
                    content.to_string(),
                    rewritten,
                    tone.to_string(),
                )
            }
            None => Message::new(message_id, room_id, sender_id.clone(), content.to_string()),
        };

        self.ctx.message_repo().create(&message).await?;

        info!(
            message_id = %message_id,
            room_id = %room_id,
            tone = message.tone.as_deref().unwrap_or("none"),
            "Message posted"
        );

        let sender = self.ctx.user_repo().find_by_id(sender_id).await?;
        Ok(MessageResponse::from(MessageWithSender { message, sender }))
    }

    /// Most recent messages of a room, newest first.
    ///
    /// `limit` defaults to 50 and is clamped to 1..=100.
    #[instrument(skip(self))]
    pub async fn list_recent(
        &self,
        room_id: Snowflake,
        limit: Option<i64>,
    ) -> ServiceResult<Vec<MessageResponse>> {
        RoomService::new(self.ctx).require_room(room_id).await?;

        let limit = clamp_limit(limit);
        let messages = self.ctx.message_repo().find_recent(room_id, limit).await?;

        let mut sender_ids: Vec<UserId> = messages.iter().map(|m| m.sender_id.clone()).collect();
        sender_ids.sort();
        sender_ids.dedup();
        let users = self.ctx.users_by_id(&sender_ids).await?;

        Ok(messages
            .into_iter()
            .map(|message| {
                let sender = users.get(&message.sender_id).cloned();
                MessageResponse::from(MessageWithSender { message, sender })
            })
            .collect())
    }

    /// Delete a message. Only its sender may do so.
    ///
    /// When `room_id` is given, a message from another room is reported as
    /// not found.
    #[instrument(skip(self))]
    pub async fn delete_message(
        &self,
        room_id: Option<Snowflake>,
        message_id: Snowflake,
        requester_id: &UserId,
    ) -> ServiceResult<()> {
        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .filter(|m| room_id.map_or(true, |room_id| m.room_id == room_id))
            .ok_or(DomainError::MessageNotFound(message_id))?;

        if !message.is_sent_by(requester_id) {
            warn!(
                message_id = %message_id,
                requester_id = %requester_id,
                "Rejected delete by non-sender"
            );
            return Err(DomainError::NotMessageSender.into());
        }

        if !self.ctx.message_repo().delete(message_id).await? {
            return Err(DomainError::MessageNotFound(message_id).into());
        }

        info!(message_id = %message_id, room_id = %message.room_id, "Message deleted");
        Ok(())
    }
}

fn clamp_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_MESSAGE_LIMIT)
        .clamp(1, MAX_MESSAGE_LIMIT)
}
