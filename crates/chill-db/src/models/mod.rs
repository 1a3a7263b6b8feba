//! Database models - SQLx-compatible structs for PostgreSQL tables

mod message;
mod participant;
mod room;
mod user;

pub use message::MessageModel;
pub use participant::ParticipantModel;
pub use room::RoomModel;
pub use user::UserModel;
