//! # chill-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for the repository traits
//! defined in `chill-core`. It handles:
//!
//! - Connection pool management and runtime migrations
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers
//! - Repository implementations
//! - The default room catalogue
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chill_db::{create_pool, run_migrations, PgRoomRepository, PoolConfig};
//! use chill_core::traits::RoomRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::new("postgres://localhost/chill")).await?;
//!     run_migrations(&pool, "crates/chill-db/migrations").await?;
//!     let rooms = PgRoomRepository::new(pool).list().await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod seed;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, MigrationError, PgPool, PoolConfig};
pub use repositories::{
    PgMessageRepository, PgParticipantRepository, PgRoomRepository, PgUserRepository,
};
pub use seed::DEFAULT_ROOMS;
