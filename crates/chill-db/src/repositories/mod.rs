//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in chill-core.

mod error;
mod message;
mod participant;
mod room;
mod user;

pub use message::PgMessageRepository;
pub use participant::PgParticipantRepository;
pub use room::PgRoomRepository;
pub use user::PgUserRepository;
