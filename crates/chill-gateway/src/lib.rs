//! # chill-gateway
//!
//! WebSocket gateway for room presence and chat.
//!
//! Clients register their connection, join rooms, update presence and post
//! messages over a single socket. Room-scoped events go to every connection
//! subscribed to the room; `user-online` and `user-offline` go to everyone.

pub mod connection;
pub mod events;
pub mod handlers;
pub mod protocol;
pub mod server;

pub use server::{create_app, create_gateway_state, run, GatewayState};
