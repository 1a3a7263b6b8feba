//! Op code handlers
//!
//! Routes incoming frames by op code, then Request frames by operation name.

mod error;
mod heartbeat;
mod registry;
mod room;

pub use error::{HandlerError, HandlerResult};
pub use heartbeat::HeartbeatHandler;
pub use registry::RegistryHandler;
pub use room::RoomHandler;

use crate::connection::Connection;
use crate::protocol::{CloseCode, ErrorAck, GatewayMessage, OpCode, Operation};
use crate::server::GatewayState;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Dispatch incoming client messages to appropriate handlers
pub struct MessageDispatcher;

impl MessageDispatcher {
    /// Handle an incoming client message
    ///
    /// Returns a close code when the connection must be closed.
    pub async fn dispatch(
        state: &GatewayState,
        connection: &Arc<Connection>,
        message: GatewayMessage,
    ) -> HandlerResult<Option<CloseCode>> {
        if !message.op.is_client_op() {
            tracing::warn!(
                connection_id = %connection.id(),
                op = %message.op,
                "Received server-only op code from client"
            );
            return Ok(Some(CloseCode::UnknownOpcode));
        }

        match message.op {
            OpCode::Heartbeat => {
                HeartbeatHandler::handle(connection).await?;
                Ok(None)
            }
            OpCode::Request => Self::request(state, connection, message).await,
            _ => {
                tracing::error!(op = %message.op, "Unhandled client op code");
                Ok(Some(CloseCode::UnknownOpcode))
            }
        }
    }

    /// Run a Request frame and acknowledge it with the same name and nonce
    async fn request(
        state: &GatewayState,
        connection: &Arc<Connection>,
        message: GatewayMessage,
    ) -> HandlerResult<Option<CloseCode>> {
        let GatewayMessage { t, n, d, .. } = message;
        let name = t.unwrap_or_default();

        let result = Self::run(state, connection, &name, d.unwrap_or(Value::Null)).await;

        let data = match result {
            Ok(data) => data,
            Err(e) => {
                if let Some(code) = e.to_close_code() {
                    return Ok(Some(code));
                }
                tracing::debug!(
                    connection_id = %connection.id(),
                    operation = %name,
                    error = %e,
                    "Request failed"
                );
                serde_json::to_value(ErrorAck::new(e.to_string()))?
            }
        };

        connection
            .send(GatewayMessage::ack(name, n, data))
            .await
            .map_err(|_| HandlerError::ConnectionClosed)?;

        Ok(None)
    }

    async fn run(
        state: &GatewayState,
        connection: &Arc<Connection>,
        name: &str,
        data: Value,
    ) -> HandlerResult<Value> {
        let operation = Operation::from_name(name)
            .ok_or_else(|| HandlerError::UnknownOperation(name.to_string()))?;

        match operation {
            Operation::RegisterConnection => {
                RegistryHandler::register(state, connection, payload(data)?).await
            }
            Operation::RoomJoin => RoomHandler::join(state, connection, payload(data)?).await,
            Operation::RoomLeave => RoomHandler::leave(state, connection, payload(data)?).await,
            Operation::RoomUpdatePresence => {
                RoomHandler::update_presence(state, connection, payload(data)?).await
            }
            Operation::RoomSendMessage => {
                RoomHandler::send_message(state, connection, payload(data)?).await
            }
        }
    }
}

fn payload<T: DeserializeOwned>(data: Value) -> HandlerResult<T> {
    serde_json::from_value(data).map_err(|e| HandlerError::InvalidPayload(e.to_string()))
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::connection::{Connection, ConnectionManager};
    use crate::protocol::GatewayMessage;
    use crate::server::GatewayState;
    use chill_common::AppConfig;
    use chill_service::testing::InMemoryStore;
    use chill_service::ServiceContext;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    pub(crate) fn gateway(store: &InMemoryStore) -> GatewayState {
        gateway_with(store.context())
    }

    pub(crate) fn gateway_with(ctx: ServiceContext) -> GatewayState {
        GatewayState::new(
            ctx,
            ConnectionManager::new_shared(),
            AppConfig::with_database_url("postgres://localhost/unused"),
        )
    }

    pub(crate) fn open(
        state: &GatewayState,
        id: &str,
    ) -> (Arc<Connection>, mpsc::Receiver<GatewayMessage>) {
        let (tx, rx) = mpsc::channel(64);
        let connection = state.connection_manager().add_connection(id.to_string(), tx);
        (connection, rx)
    }

    pub(crate) fn drain(rx: &mut mpsc::Receiver<GatewayMessage>) -> Vec<GatewayMessage> {
        let mut messages = Vec::new();
        while let Ok(message) = rx.try_recv() {
            messages.push(message);
        }
        messages
    }
}
