//! Heartbeat handler (op 1)

use super::{HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::protocol::GatewayMessage;
use std::sync::Arc;

/// Handles heartbeat messages
pub struct HeartbeatHandler;

impl HeartbeatHandler {
    /// Record the heartbeat and answer with a Heartbeat ACK
    pub async fn handle(connection: &Arc<Connection>) -> HandlerResult<()> {
        connection.record_heartbeat().await;

        tracing::trace!(
            connection_id = %connection.id(),
            server_seq = connection.current_sequence(),
            "Heartbeat received"
        );

        connection
            .send(GatewayMessage::heartbeat_ack())
            .await
            .map_err(|_| HandlerError::ConnectionClosed)
    }
}
