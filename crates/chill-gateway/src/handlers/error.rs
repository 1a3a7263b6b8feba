//! Handler error types

use crate::protocol::CloseCode;
use chill_common::AppError;
use chill_core::DomainError;
use chill_service::ServiceError;
use thiserror::Error;

/// Handler error type
///
/// Only transport failures close the socket. Everything else is reported
/// to the client as a failed acknowledgement.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Request payload did not match the operation
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Request named an operation the gateway does not know
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Operation needs a user but none was supplied or registered
    #[error("Connection is not registered")]
    NotRegistered,

    /// Service error
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Domain error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Identity or configuration error
    #[error(transparent)]
    App(#[from] AppError),

    /// Acknowledgement could not be encoded
    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    /// The outgoing channel is closed
    #[error("Connection closed")]
    ConnectionClosed,
}

impl HandlerError {
    /// Close code for errors that end the connection
    pub fn to_close_code(&self) -> Option<CloseCode> {
        match self {
            Self::ConnectionClosed => Some(CloseCode::UnknownError),
            _ => None,
        }
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chill_core::Snowflake;

    #[test]
    fn test_operation_failures_do_not_close() {
        let err = HandlerError::from(ServiceError::from(DomainError::RoomNotFound(
            Snowflake::new(9),
        )));
        assert_eq!(err.to_string(), "Room not found: 9");
        assert!(err.to_close_code().is_none());

        assert!(HandlerError::UnknownOperation("x".into())
            .to_close_code()
            .is_none());
        assert_eq!(
            HandlerError::ConnectionClosed.to_close_code(),
            Some(CloseCode::UnknownError)
        );
    }
}
