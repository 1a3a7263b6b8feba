//! Connection management
//!
//! Tracks WebSocket connections, their registered users, and room broadcast groups.

mod connection;
mod manager;

pub use connection::Connection;
pub use manager::ConnectionManager;
