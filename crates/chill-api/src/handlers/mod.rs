//! Route handlers
//!
//! HTTP request handlers organized by resource.

pub mod health;
pub mod messages;
pub mod rooms;
pub mod upload;
