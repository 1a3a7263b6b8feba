//! Ports - traits the infrastructure layer implements

mod collaborators;
mod repositories;

pub use collaborators::{ObjectStore, PassThroughTone, ToneTransformer};
pub use repositories::{
    MessageRepository, ParticipantRepository, RepoResult, RoomRepository, UserRepository,
};
