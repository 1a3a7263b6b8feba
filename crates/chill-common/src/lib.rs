//! # chill-common
//!
//! Shared utilities including configuration, error handling, identity
//! resolution, object storage, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod storage;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{Claims, IdentityResolver, JwtService, UnconfiguredIdentity};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    RateLimitConfig, ServerConfig, SnowflakeConfig, StorageConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use storage::{object_store_from_config, LocalObjectStore, UnconfiguredObjectStore};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
