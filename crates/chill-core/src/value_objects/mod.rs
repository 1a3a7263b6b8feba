//! Value objects - immutable types that represent domain concepts

mod snowflake;
mod user_id;

pub use snowflake::{Snowflake, SnowflakeError, SnowflakeGenerator, MAX_WORKER_ID};
pub use user_id::{InvalidUserId, UserId, MAX_USER_ID_LENGTH};
