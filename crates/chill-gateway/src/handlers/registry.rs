//! Connection registry: `register-connection` and disconnect cleanup

use super::{HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::events::GatewayEvent;
use crate::protocol::{RegisterConnectionPayload, SuccessAck};
use crate::server::GatewayState;
use chill_core::{DomainError, UserId};
use chill_service::PresenceService;
use serde_json::Value;
use std::sync::Arc;

/// Handles connection registration and teardown
pub struct RegistryHandler;

impl RegistryHandler {
    /// Map the connection to a user and announce it to everyone
    pub async fn register(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: RegisterConnectionPayload,
    ) -> HandlerResult<Value> {
        let user_id = Self::resolve_registration(state, payload)?;

        state
            .connection_manager()
            .register_connection(connection.id(), user_id.clone())
            .await;

        tracing::info!(
            connection_id = %connection.id(),
            user_id = %user_id,
            "Connection registered"
        );

        state
            .connection_manager()
            .broadcast(&GatewayEvent::user_online(user_id))
            .await;

        Ok(serde_json::to_value(SuccessAck::new())?)
    }

    /// Tear down a closed connection.
    ///
    /// Leaves every room joined through it (unless the same user is still in
    /// that room on another connection), drops it from all broadcast groups,
    /// then announces the user offline.
    pub async fn disconnect(state: &GatewayState, connection: &Arc<Connection>) {
        let manager = state.connection_manager();
        let presence = PresenceService::new(state.service_context());

        for (room_id, user_id) in connection.rooms().await {
            manager.unsubscribe_from_room(connection.id(), room_id).await;

            if manager
                .is_in_room_elsewhere(&user_id, room_id, connection.id())
                .await
            {
                tracing::debug!(
                    user_id = %user_id,
                    room_id = %room_id,
                    "User still in room on another connection"
                );
                continue;
            }

            if let Err(e) = presence.leave(&user_id, room_id).await {
                tracing::warn!(
                    user_id = %user_id,
                    room_id = %room_id,
                    error = %e,
                    "Failed to leave room on disconnect"
                );
                continue;
            }

            manager
                .send_to_room(room_id, &GatewayEvent::participant_left(user_id, room_id))
                .await;
        }

        manager.remove_connection(connection.id()).await;

        if let Some(user_id) = connection.user_id().await {
            manager
                .broadcast(&GatewayEvent::user_offline(user_id))
                .await;
        }

        tracing::info!(
            connection_id = %connection.id(),
            age_secs = connection.age().as_secs(),
            "Connection cleaned up"
        );
    }

    fn resolve_registration(
        state: &GatewayState,
        payload: RegisterConnectionPayload,
    ) -> HandlerResult<UserId> {
        match (payload.token.as_deref(), payload.user_id) {
            (Some(token), claimed) => {
                let token = token.strip_prefix("Bearer ").unwrap_or(token);
                let resolved = state.service_context().identity().resolve(token)?;
                match claimed {
                    Some(claimed) if claimed != resolved => Err(DomainError::UserMismatch.into()),
                    _ => Ok(resolved),
                }
            }
            (None, Some(user_id)) => Ok(user_id),
            (None, None) => Err(HandlerError::InvalidPayload(
                "userId or token is required".to_string(),
            )),
        }
    }
}
