//! Database connection pool management and migrations

mod migrate;
mod postgres;

pub use migrate::{run_migrations, MigrationError};
pub use postgres::{create_pool, PoolConfig};

// Re-export PgPool for convenience
pub use sqlx::postgres::PgPool;
