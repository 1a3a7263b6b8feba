//! # chill-api
//!
//! REST API server built with Axum: the room directory, message history,
//! image uploads and health probes, with an OpenAPI document.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run};
pub use state::AppState;
