//! # chill-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use services::{
    MessageService, PresenceService, RoomService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, UploadService,
};
