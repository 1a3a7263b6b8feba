//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{Message, Participant, Room, UserSummary};
use crate::error::DomainError;
use crate::value_objects::{Snowflake, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Room Repository
// ============================================================================

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Find room by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Room>>;

    /// List all rooms ordered by name
    async fn list(&self) -> RepoResult<Vec<Room>>;

    /// Insert a room unless one with the same name exists.
    ///
    /// Returns whether the row was inserted.
    async fn create(&self, room: &Room) -> RepoResult<bool>;

    /// Recount the room's participants and store the result as `active_users`.
    ///
    /// Returns the new count, or `None` when the room does not exist.
    async fn refresh_active_users(&self, id: Snowflake) -> RepoResult<Option<i32>>;
}

// ============================================================================
// Participant Repository
// ============================================================================

#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// Find the participant row for a (user, room) pair
    async fn find(&self, user_id: &UserId, room_id: Snowflake) -> RepoResult<Option<Participant>>;

    /// List participants of a room ordered by join time
    async fn find_by_room(&self, room_id: Snowflake) -> RepoResult<Vec<Participant>>;

    /// List participants of several rooms at once
    async fn find_by_rooms(&self, room_ids: &[Snowflake]) -> RepoResult<Vec<Participant>>;

    /// Insert a participant.
    ///
    /// Fails with `DomainError::ParticipantExists` when the pair already has a row.
    async fn create(&self, participant: &Participant) -> RepoResult<()>;

    /// Update emoji, status and `updated_at` of an existing row
    async fn update(&self, participant: &Participant) -> RepoResult<()>;

    /// Delete a participant row, returning whether one existed
    async fn delete(&self, user_id: &UserId, room_id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find message by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>>;

    /// Most recent messages of a room, newest first
    async fn find_recent(&self, room_id: Snowflake, limit: i64) -> RepoResult<Vec<Message>>;

    /// Create a new message
    async fn create(&self, message: &Message) -> RepoResult<()>;

    /// Hard delete a message, returning whether it existed
    async fn delete(&self, id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// User Repository
// ============================================================================

/// Read-only access to the externally owned user directory
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> RepoResult<Option<UserSummary>>;

    async fn find_by_ids(&self, ids: &[UserId]) -> RepoResult<Vec<UserSummary>>;
}
