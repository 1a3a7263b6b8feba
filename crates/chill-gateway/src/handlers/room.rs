//! Room operations: join, leave, presence updates and chat messages

use super::{HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::events::GatewayEvent;
use crate::protocol::{
    JoinAck, MessageAck, ParticipantAck, RoomLeavePayload, RoomPresencePayload,
    SendMessagePayload, SuccessAck,
};
use crate::server::GatewayState;
use chill_core::{DomainError, Snowflake, UserId};
use chill_service::{MessageService, PresenceService};
use serde_json::Value;
use std::sync::Arc;

/// Handles room-scoped requests
pub struct RoomHandler;

impl RoomHandler {
    /// `room-join`
    pub async fn join(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: RoomPresencePayload,
    ) -> HandlerResult<Value> {
        let user_id = resolve_user(connection, payload.user_id).await?;
        let room_id = payload.room_id;
        ensure_room_holder(connection, room_id, &user_id).await?;
        let presence = PresenceService::new(state.service_context());

        let participant = presence
            .join(
                &user_id,
                room_id,
                payload.emoji.as_deref(),
                payload.status.as_deref(),
            )
            .await?;

        let manager = state.connection_manager();
        manager
            .subscribe_to_room(connection.id(), room_id, user_id)
            .await;
        manager
            .send_to_room(room_id, &GatewayEvent::participant_joined(participant, room_id))
            .await;

        let snapshot = presence.room_snapshot(room_id).await?;
        Ok(serde_json::to_value(JoinAck::from(snapshot))?)
    }

    /// `room-leave`
    pub async fn leave(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: RoomLeavePayload,
    ) -> HandlerResult<Value> {
        let user_id = resolve_user(connection, payload.user_id).await?;
        let room_id = payload.room_id;

        PresenceService::new(state.service_context())
            .leave(&user_id, room_id)
            .await?;

        let manager = state.connection_manager();
        // Only the user that joined through this connection releases the room
        if connection.room_member(room_id).await.as_ref() == Some(&user_id) {
            manager.unsubscribe_from_room(connection.id(), room_id).await;
        }
        manager
            .send_to_room(room_id, &GatewayEvent::participant_left(user_id, room_id))
            .await;

        Ok(serde_json::to_value(SuccessAck::new())?)
    }

    /// `room-update-presence`
    pub async fn update_presence(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: RoomPresencePayload,
    ) -> HandlerResult<Value> {
        let user_id = resolve_user(connection, payload.user_id).await?;
        let room_id = payload.room_id;

        let participant = PresenceService::new(state.service_context())
            .update_presence(
                &user_id,
                room_id,
                payload.emoji.as_deref(),
                payload.status.as_deref(),
            )
            .await?;

        state
            .connection_manager()
            .send_to_room(
                room_id,
                &GatewayEvent::participant_updated(participant.clone(), room_id),
            )
            .await;

        Ok(serde_json::to_value(ParticipantAck {
            success: true,
            participant,
        })?)
    }

    /// `room-send-message`
    pub async fn send_message(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: SendMessagePayload,
    ) -> HandlerResult<Value> {
        let user_id = resolve_user(connection, payload.user_id).await?;
        let room_id = payload.room_id;

        let message = MessageService::new(state.service_context())
            .post_message(&user_id, room_id, &payload.content, payload.tone.as_deref())
            .await?;

        state
            .connection_manager()
            .send_to_room(room_id, &GatewayEvent::new_message(message.clone(), room_id))
            .await;

        Ok(serde_json::to_value(MessageAck {
            success: true,
            message,
        })?)
    }
}

/// Pick the acting user for a room operation.
///
/// A registered connection acts as its registered user; a supplied id must
/// match it.
async fn resolve_user(
    connection: &Connection,
    supplied: Option<UserId>,
) -> HandlerResult<UserId> {
    match (supplied, connection.user_id().await) {
        (Some(supplied), Some(registered)) if supplied != registered => {
            Err(DomainError::UserMismatch.into())
        }
        (Some(user_id), _) | (None, Some(user_id)) => Ok(user_id),
        (None, None) => Err(HandlerError::NotRegistered),
    }
}

/// A connection joins each room as one user only; disconnect cleanup leaves
/// as that user.
async fn ensure_room_holder(
    connection: &Connection,
    room_id: Snowflake,
    user_id: &UserId,
) -> HandlerResult<()> {
    match connection.room_member(room_id).await {
        Some(holder) if &holder != user_id => Err(DomainError::UserMismatch.into()),
        _ => Ok(()),
    }
}
