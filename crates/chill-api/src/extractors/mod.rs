//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, path ids and query
//! parameters. All of them reject with `ApiError`.

mod auth;
mod path;
mod query;
mod validated;

pub use auth::AuthUser;
pub use path::{RoomMessagePath, RoomPath};
pub use query::HistoryQuery;
pub use validated::ValidatedJson;
