//! Individual WebSocket connection
//!
//! Represents a single WebSocket connection and its state.

use crate::protocol::GatewayMessage;
use chill_core::{Snowflake, UserId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// A single WebSocket connection
pub struct Connection {
    /// Unique connection ID
    id: String,

    /// Registered user (None until register-connection)
    user_id: RwLock<Option<UserId>>,

    /// Channel to send messages to the WebSocket
    sender: mpsc::Sender<GatewayMessage>,

    /// Last dispatch sequence number sent
    sequence: AtomicU64,

    /// Last heartbeat received
    last_heartbeat: RwLock<Instant>,

    /// Rooms joined through this connection, with the user that joined
    rooms: RwLock<HashMap<Snowflake, UserId>>,

    /// Connection creation time
    created_at: Instant,
}

impl Connection {
    /// Create a new connection
    pub fn new(id: String, sender: mpsc::Sender<GatewayMessage>) -> Arc<Self> {
        Arc::new(Self {
            id,
            user_id: RwLock::new(None),
            sender,
            sequence: AtomicU64::new(0),
            last_heartbeat: RwLock::new(Instant::now()),
            rooms: RwLock::new(HashMap::new()),
            created_at: Instant::now(),
        })
    }

    /// Generate a new connection ID
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Get the connection ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the registered user ID
    pub async fn user_id(&self) -> Option<UserId> {
        self.user_id.read().await.clone()
    }

    /// Set the registered user, returning the previous one
    pub async fn set_user_id(&self, user_id: UserId) -> Option<UserId> {
        self.user_id.write().await.replace(user_id)
    }

    /// Check if the connection has registered a user
    pub async fn is_registered(&self) -> bool {
        self.user_id.read().await.is_some()
    }

    /// Get the next dispatch sequence number
    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Get the current sequence number
    pub fn current_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Record a heartbeat received
    pub async fn record_heartbeat(&self) {
        *self.last_heartbeat.write().await = Instant::now();
    }

    /// Get time since last heartbeat
    pub async fn time_since_heartbeat(&self) -> Duration {
        self.last_heartbeat.read().await.elapsed()
    }

    /// Record a room joined through this connection
    pub async fn join_room(&self, room_id: Snowflake, user_id: UserId) {
        self.rooms.write().await.insert(room_id, user_id);
    }

    /// Forget a room, returning the user that joined it
    pub async fn leave_room(&self, room_id: Snowflake) -> Option<UserId> {
        self.rooms.write().await.remove(&room_id)
    }

    /// Rooms joined through this connection
    pub async fn rooms(&self) -> Vec<(Snowflake, UserId)> {
        self.rooms
            .read()
            .await
            .iter()
            .map(|(room_id, user_id)| (*room_id, user_id.clone()))
            .collect()
    }

    /// User that joined `room_id` through this connection, if any
    pub async fn room_member(&self, room_id: Snowflake) -> Option<UserId> {
        self.rooms.read().await.get(&room_id).cloned()
    }

    /// Get connection age
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Send a message to this connection
    pub async fn send(
        &self,
        message: GatewayMessage,
    ) -> Result<(), mpsc::error::SendError<GatewayMessage>> {
        self.sender.send(message).await
    }

    /// Queue a message without waiting for room in the outgoing buffer
    pub fn try_send(
        &self,
        message: GatewayMessage,
    ) -> Result<(), mpsc::error::TrySendError<GatewayMessage>> {
        self.sender.try_send(message)
    }

    /// Check if the sender channel is closed
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("sequence", &self.sequence.load(Ordering::SeqCst))
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connection_creation() {
        let (tx, _rx) = mpsc::channel(10);
        let conn = Connection::new("conn1".to_string(), tx);

        assert_eq!(conn.id(), "conn1");
        assert!(conn.user_id().await.is_none());
        assert!(!conn.is_registered().await);
    }

    #[tokio::test]
    async fn test_connection_registration() {
        let (tx, _rx) = mpsc::channel(10);
        let conn = Connection::new("conn1".to_string(), tx);

        assert_eq!(conn.set_user_id(UserId::new("u1")).await, None);
        assert_eq!(
            conn.set_user_id(UserId::new("u2")).await,
            Some(UserId::new("u1"))
        );
        assert_eq!(conn.user_id().await, Some(UserId::new("u2")));
    }

    #[tokio::test]
    async fn test_connection_sequence() {
        let (tx, _rx) = mpsc::channel(10);
        let conn = Connection::new("conn1".to_string(), tx);

        assert_eq!(conn.current_sequence(), 0);
        assert_eq!(conn.next_sequence(), 1);
        assert_eq!(conn.next_sequence(), 2);
        assert_eq!(conn.current_sequence(), 2);
    }

    #[tokio::test]
    async fn test_connection_rooms() {
        let (tx, _rx) = mpsc::channel(10);
        let conn = Connection::new("conn1".to_string(), tx);
        let room1 = Snowflake::new(1);
        let room2 = Snowflake::new(2);

        conn.join_room(room1, UserId::new("u1")).await;
        conn.join_room(room2, UserId::new("u1")).await;
        assert_eq!(conn.rooms().await.len(), 2);
        assert_eq!(conn.room_member(room1).await, Some(UserId::new("u1")));

        assert_eq!(conn.leave_room(room1).await, Some(UserId::new("u1")));
        assert_eq!(conn.leave_room(room1).await, None);
        assert_eq!(conn.rooms().await, vec![(room2, UserId::new("u1"))]);
    }

    #[tokio::test]
    async fn test_try_send_reports_full_buffer() {
        let (tx, mut rx) = mpsc::channel(1);
        let conn = Connection::new("conn1".to_string(), tx);

        conn.try_send(GatewayMessage::heartbeat_ack()).unwrap();
        assert!(matches!(
            conn.try_send(GatewayMessage::heartbeat_ack()),
            Err(mpsc::error::TrySendError::Full(_))
        ));

        rx.recv().await.unwrap();
        assert!(conn.try_send(GatewayMessage::heartbeat_ack()).is_ok());
    }

    #[tokio::test]
    async fn test_connection_heartbeat() {
        let (tx, _rx) = mpsc::channel(10);
        let conn = Connection::new("conn1".to_string(), tx);

        conn.record_heartbeat().await;
        assert!(conn.time_since_heartbeat().await < Duration::from_secs(1));
    }
}
