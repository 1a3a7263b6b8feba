//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API and gateway outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{CreateRoomRequest, ListMessagesQuery};

pub use responses::{
    HealthChecks, HealthResponse, JoinRoomResponse, MessageResponse, ParticipantResponse,
    ReadinessResponse, RoomResponse, UploadResponse, UploadedFile, UserResponse,
};

pub use mappers::{MessageWithSender, ParticipantWithUser, RoomWithParticipants};
