//! Integration test utilities for the room service
//!
//! Spawns the REST API and the WebSocket gateway on local ports and drives
//! them with real HTTP and WebSocket clients.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
