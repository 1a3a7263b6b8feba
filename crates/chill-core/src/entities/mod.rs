//! Domain entities - core business objects

mod message;
mod participant;
mod room;
mod user;

pub use message::{Message, MAX_CONTENT_LENGTH};
pub use participant::{Participant, DEFAULT_EMOJI, DEFAULT_STATUS};
pub use room::Room;
pub use user::UserSummary;
