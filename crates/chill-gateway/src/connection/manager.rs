//! Connection manager
//!
//! Manages all active WebSocket connections and room broadcast groups using
//! DashMap for thread-safe access.

use super::Connection;
use crate::events::GatewayEvent;
use crate::protocol::GatewayMessage;
use chill_core::{Snowflake, UserId};
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Manages all active WebSocket connections
pub struct ConnectionManager {
    /// Active connections by connection ID
    connections: DashMap<String, Arc<Connection>>,

    /// Registered user ID to connection IDs
    user_connections: DashMap<UserId, HashSet<String>>,

    /// Room ID to subscribed connection IDs (the room's broadcast group)
    room_connections: DashMap<Snowflake, HashSet<String>>,
}

impl ConnectionManager {
    /// Create a new connection manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            user_connections: DashMap::new(),
            room_connections: DashMap::new(),
        }
    }

    /// Create a new connection manager wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Add a new connection
    pub fn add_connection(
        &self,
        connection_id: String,
        sender: mpsc::Sender<GatewayMessage>,
    ) -> Arc<Connection> {
        let connection = Connection::new(connection_id.clone(), sender);
        self.connections
            .insert(connection_id.clone(), connection.clone());

        tracing::debug!(connection_id = %connection_id, "Connection added");

        connection
    }

    /// Remove a connection from every index and broadcast group
    ///
    /// Uses `alter` + `retain` so empty index entries are dropped atomically.
    pub async fn remove_connection(&self, connection_id: &str) -> Option<Arc<Connection>> {
        let (_, connection) = self.connections.remove(connection_id)?;

        if let Some(user_id) = connection.user_id().await {
            self.user_connections.alter(&user_id, |_, mut ids| {
                ids.remove(connection_id);
                ids
            });
            self.user_connections.retain(|_, ids| !ids.is_empty());
        }

        for (room_id, _) in connection.rooms().await {
            self.room_connections.alter(&room_id, |_, mut ids| {
                ids.remove(connection_id);
                ids
            });
        }
        self.room_connections.retain(|_, ids| !ids.is_empty());

        tracing::debug!(connection_id = %connection_id, "Connection removed");

        Some(connection)
    }

    /// Get a connection by ID
    pub fn get_connection(&self, connection_id: &str) -> Option<Arc<Connection>> {
        self.connections.get(connection_id).map(|r| r.clone())
    }

    /// Map a connection to a user
    pub async fn register_connection(&self, connection_id: &str, user_id: UserId) -> bool {
        let Some(connection) = self.get_connection(connection_id) else {
            return false;
        };

        if let Some(previous) = connection.set_user_id(user_id.clone()).await {
            if previous != user_id {
                self.user_connections.alter(&previous, |_, mut ids| {
                    ids.remove(connection_id);
                    ids
                });
                self.user_connections.retain(|_, ids| !ids.is_empty());
            }
        }

        self.user_connections
            .entry(user_id.clone())
            .or_default()
            .insert(connection_id.to_string());

        tracing::debug!(
            connection_id = %connection_id,
            user_id = %user_id,
            "Connection registered"
        );

        true
    }

    /// Subscribe a connection to a room and record the room on the connection
    pub async fn subscribe_to_room(
        &self,
        connection_id: &str,
        room_id: Snowflake,
        user_id: UserId,
    ) -> bool {
        let Some(connection) = self.get_connection(connection_id) else {
            return false;
        };

        connection.join_room(room_id, user_id).await;
        self.room_connections
            .entry(room_id)
            .or_default()
            .insert(connection_id.to_string());

        tracing::trace!(
            connection_id = %connection_id,
            room_id = %room_id,
            "Connection subscribed to room"
        );

        true
    }

    /// Unsubscribe a connection from a room
    ///
    /// Returns the user that had joined the room through this connection.
    pub async fn unsubscribe_from_room(
        &self,
        connection_id: &str,
        room_id: Snowflake,
    ) -> Option<UserId> {
        let connection = self.get_connection(connection_id)?;
        let user_id = connection.leave_room(room_id).await;

        self.room_connections.alter(&room_id, |_, mut ids| {
            ids.remove(connection_id);
            ids
        });
        self.room_connections.retain(|_, ids| !ids.is_empty());

        tracing::trace!(
            connection_id = %connection_id,
            room_id = %room_id,
            "Connection unsubscribed from room"
        );

        user_id
    }

    /// Get all connections of a registered user
    pub fn get_user_connections(&self, user_id: &UserId) -> Vec<Arc<Connection>> {
        self.collect(self.user_connections.get(user_id).map(|ids| ids.clone()))
    }

    /// Get all connections subscribed to a room
    pub fn get_room_connections(&self, room_id: Snowflake) -> Vec<Arc<Connection>> {
        self.collect(self.room_connections.get(&room_id).map(|ids| ids.clone()))
    }

    /// Whether another live connection joined `room_id` as `user_id`
    pub async fn is_in_room_elsewhere(
        &self,
        user_id: &UserId,
        room_id: Snowflake,
        except_connection: &str,
    ) -> bool {
        for connection in self.get_room_connections(room_id) {
            if connection.id() == except_connection || connection.is_closed() {
                continue;
            }
            if connection.room_member(room_id).await.as_ref() == Some(user_id) {
                return true;
            }
        }
        false
    }

    /// Dispatch an event to every connection subscribed to a room
    pub async fn send_to_room(&self, room_id: Snowflake, event: &GatewayEvent) -> usize {
        let sent = Self::dispatch(self.get_room_connections(room_id), event);

        tracing::trace!(
            room_id = %room_id,
            event = %event.event_type(),
            sent,
            "Event sent to room"
        );

        sent
    }

    /// Dispatch an event to all connections
    pub async fn broadcast(&self, event: &GatewayEvent) -> usize {
        let connections: Vec<Arc<Connection>> =
            self.connections.iter().map(|r| r.value().clone()).collect();
        let sent = Self::dispatch(connections, event);

        tracing::debug!(event = %event.event_type(), sent, "Event broadcast to all connections");

        sent
    }

    /// Get the total number of active connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Get the number of unique registered users
    pub fn user_count(&self) -> usize {
        self.user_connections.len()
    }

    /// Get the number of rooms with subscribed connections
    pub fn room_count(&self) -> usize {
        self.room_connections.len()
    }

    /// Check if a connection exists
    pub fn has_connection(&self, connection_id: &str) -> bool {
        self.connections.contains_key(connection_id)
    }

    fn collect(&self, ids: Option<HashSet<String>>) -> Vec<Arc<Connection>> {
        ids.map(|ids| {
            ids.iter()
                .filter_map(|id| self.connections.get(id).map(|c| c.clone()))
                .collect()
        })
        .unwrap_or_default()
    }

    /// Queue the event on every connection without waiting.
    ///
    /// A connection whose outgoing buffer is full misses the event; its
    /// sequence still advances so the client can see the gap.
    fn dispatch(connections: Vec<Arc<Connection>>, event: &GatewayEvent) -> usize {
        let data = match event.to_data() {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(event = %event.event_type(), error = %e, "Failed to encode event");
                return 0;
            }
        };

        let mut sent = 0;
        for connection in connections {
            let message = GatewayMessage::dispatch(
                event.event_type(),
                connection.next_sequence(),
                data.clone(),
            );
            match connection.try_send(message) {
                Ok(()) => sent += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(
                        connection_id = %connection.id(),
                        event = %event.event_type(),
                        "Outgoing buffer full, dropping event"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {}
            }
        }
        sent
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connections.len())
            .field("users", &self.user_connections.len())
            .field("rooms", &self.room_connections.len())
            .finish()
    }
}
