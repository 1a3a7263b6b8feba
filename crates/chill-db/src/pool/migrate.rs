//! Schema migrations
//!
//! Migrations are plain SQL files loaded at runtime, so the crate builds
//! without a database.

use std::path::Path;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use tracing::info;

/// Migration failures
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Failed to load migrations from {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: MigrateError,
    },

    #[error("Failed to apply migrations: {0}")]
    Apply(#[from] MigrateError),
}

/// Apply all pending migrations found in `dir`
pub async fn run_migrations(pool: &PgPool, dir: impl AsRef<Path>) -> Result<(), MigrationError> {
    let dir = dir.as_ref();
    let migrator = Migrator::new(dir).await.map_err(|source| MigrationError::Load {
        path: dir.display().to_string(),
        source,
    })?;

    migrator.run(pool).await?;

    info!(
        path = %dir.display(),
        count = migrator.iter().count(),
        "Database migrations applied"
    );
    Ok(())
}
