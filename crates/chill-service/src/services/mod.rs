//! Business logic services
//!
//! This module contains the service layer implementations that handle
//! validation and orchestration of room, presence and chat operations.

pub mod context;
pub mod error;
pub mod message;
pub mod presence;
pub mod room;
pub mod upload;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder, DEFAULT_MAX_UPLOAD_BYTES};
pub use error::{ServiceError, ServiceResult};
pub use message::{MessageService, DEFAULT_MESSAGE_LIMIT, MAX_MESSAGE_LIMIT};
pub use presence::{PresenceService, JOIN_MESSAGE_WINDOW};
pub use room::RoomService;
pub use upload::UploadService;
