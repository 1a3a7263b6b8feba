//! # chill-core
//!
//! Domain layer for chill rooms: entities, value objects, repository traits,
//! and the ports for external collaborators (object storage, tone rewriting).
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Message, Participant, Room, UserSummary, DEFAULT_EMOJI, DEFAULT_STATUS, MAX_CONTENT_LENGTH,
};
pub use error::DomainError;
pub use traits::{
    MessageRepository, ObjectStore, ParticipantRepository, PassThroughTone, RepoResult,
    RoomRepository, ToneTransformer, UserRepository,
};
pub use value_objects::{InvalidUserId, Snowflake, SnowflakeError, SnowflakeGenerator, UserId};
