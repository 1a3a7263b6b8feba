//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{Snowflake, UserId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Room not found: {0}")]
    RoomNotFound(Snowflake),

    #[error("Participant not found: user {user_id} in room {room_id}")]
    ParticipantNotFound { user_id: UserId, room_id: Snowflake },

    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Unauthorized: only the sender can delete this message")]
    NotMessageSender,

    #[error("Unauthorized: user does not match this connection")]
    UserMismatch,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Participant already exists in this room")]
    ParticipantExists,

    // =========================================================================
    // Missing Collaborators
    // =========================================================================
    #[error("{0} is not configured")]
    Unconfigured(&'static str),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::RoomNotFound(_) => "UNKNOWN_ROOM",
            Self::ParticipantNotFound { .. } => "UNKNOWN_PARTICIPANT",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",

            Self::NotMessageSender => "NOT_MESSAGE_SENDER",
            Self::UserMismatch => "USER_MISMATCH",

            Self::ParticipantExists => "PARTICIPANT_EXISTS",

            Self::Unconfigured(_) => "UNCONFIGURED",

            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RoomNotFound(_) | Self::ParticipantNotFound { .. } | Self::MessageNotFound(_)
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::ContentTooLong { .. })
    }

    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotMessageSender | Self::UserMismatch)
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ParticipantExists)
    }

    /// Check if a required collaborator is missing
    pub fn is_unconfigured(&self) -> bool {
        matches!(self, Self::Unconfigured(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(DomainError::RoomNotFound(Snowflake::new(1)).code(), "UNKNOWN_ROOM");
        assert_eq!(DomainError::NotMessageSender.code(), "NOT_MESSAGE_SENDER");
        assert_eq!(DomainError::Unconfigured("object storage").code(), "UNCONFIGURED");
    }

    #[test]
    fn test_classification() {
        let missing = DomainError::ParticipantNotFound {
            user_id: UserId::new("u1"),
            room_id: Snowflake::new(1),
        };
        assert!(missing.is_not_found());
        assert!(!missing.is_authorization());

        assert!(DomainError::UserMismatch.is_authorization());
        assert!(DomainError::ParticipantExists.is_conflict());
        assert!(DomainError::ContentTooLong { max: 2000 }.is_validation());
        assert!(DomainError::Unconfigured("tone").is_unconfigured());
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::RoomNotFound(Snowflake::new(123));
        assert_eq!(err.to_string(), "Room not found: 123");

        let err = DomainError::Unconfigured("object storage");
        assert_eq!(err.to_string(), "object storage is not configured");

        let err = DomainError::NotMessageSender;
        assert!(err.to_string().starts_with("Unauthorized"));
    }
}
