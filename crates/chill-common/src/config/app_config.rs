//! Application configuration structs
//!
//! Loads configuration from environment variables (and `.env`).

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub gateway: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
    pub snowflake: SnowflakeConfig,
    #[serde(default = "default_true")]
    pub seed_rooms: bool,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" | "dev" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Server configuration (for both API and Gateway)
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Apply pending migrations on startup
    #[serde(default = "default_true")]
    pub run_migrations: bool,
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,
}

/// JWT configuration
///
/// Without a secret the identity resolver runs unconfigured and every
/// authenticated request fails with 503.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default = "default_token_expiry")]
    pub token_expiry: i64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Seconds between replenished requests for one client
    #[serde(default = "default_replenish_seconds")]
    pub replenish_seconds: u64,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Upload storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub upload_dir: Option<String>,
    #[serde(default)]
    pub public_base_url: Option<String>,
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u32,
}

impl StorageConfig {
    /// Largest accepted upload in bytes
    #[must_use]
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_size_mb as usize * 1024 * 1024
    }

    /// Both the directory and the public URL are required to accept uploads
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.upload_dir.is_some() && self.public_base_url.is_some()
    }
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

fn default_app_name() -> String {
    "chill-rooms".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
    3001
}

fn default_gateway_port() -> u16 {
    3002
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_migrations_dir() -> String {
    concat!(env!("CARGO_MANIFEST_DIR"), "/../chill-db/migrations").to_string()
}

fn default_token_expiry() -> i64 {
    3600
}

// 100 requests per 15 minutes, expressed as a token bucket
fn default_replenish_seconds() -> u64 {
    9
}

fn default_burst() -> u32 {
    100
}

fn default_max_upload_size() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

/// Read an optional variable, treating blank values as unset
fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read and parse an optional variable, rejecting unparsable values
fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    var(name)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(name, raw))
        })
        .transpose()
}

fn parse_bool(name: &'static str) -> Result<Option<bool>, ConfigError> {
    var(name)
        .map(|raw| match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue(name, raw)),
        })
        .transpose()
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if `DATABASE_URL` is missing or a value cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();

        let allowed_origins = match var("CORS_ALLOWED_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            None => var("FRONTEND_URL").into_iter().collect(),
        };

        Ok(Self {
            app: AppSettings {
                name: var("APP_NAME").unwrap_or_else(default_app_name),
                env: match var("APP_ENV") {
                    Some(raw) => Environment::parse(&raw)
                        .ok_or(ConfigError::InvalidValue("APP_ENV", raw))?,
                    None => Environment::default(),
                },
            },
            api: ServerConfig {
                host: var("API_HOST").unwrap_or_else(default_host),
                port: parse_var("API_PORT")?.unwrap_or_else(default_api_port),
            },
            gateway: ServerConfig {
                host: var("GATEWAY_HOST").unwrap_or_else(default_host),
                port: parse_var("GATEWAY_PORT")?.unwrap_or_else(default_gateway_port),
            },
            database: DatabaseConfig {
                url: var("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
                run_migrations: parse_bool("DATABASE_RUN_MIGRATIONS")?.unwrap_or(true),
                migrations_dir: var("DATABASE_MIGRATIONS_DIR")
                    .unwrap_or_else(default_migrations_dir),
            },
            jwt: JwtConfig {
                secret: var("JWT_SECRET"),
                token_expiry: parse_var("JWT_TOKEN_EXPIRY")?.unwrap_or_else(default_token_expiry),
            },
            rate_limit: RateLimitConfig {
                replenish_seconds: parse_var("RATE_LIMIT_REPLENISH_SECONDS")?
                    .unwrap_or_else(default_replenish_seconds),
                burst: parse_var("RATE_LIMIT_BURST")?.unwrap_or_else(default_burst),
            },
            cors: CorsConfig { allowed_origins },
            storage: StorageConfig {
                upload_dir: var("UPLOAD_DIR"),
                public_base_url: var("UPLOAD_PUBLIC_BASE_URL"),
                max_upload_size_mb: parse_var("MAX_UPLOAD_SIZE_MB")?
                    .unwrap_or_else(default_max_upload_size),
            },
            snowflake: SnowflakeConfig {
                worker_id: parse_var("WORKER_ID")?.unwrap_or(0),
            },
            seed_rooms: parse_bool("SEED_ROOMS")?.unwrap_or(true),
        })
    }

    /// Configuration for tests and tools that only need a database URL
    #[must_use]
    pub fn with_database_url(url: impl Into<String>) -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: Environment::Development,
            },
            api: ServerConfig {
                host: default_host(),
                port: default_api_port(),
            },
            gateway: ServerConfig {
                host: default_host(),
                port: default_gateway_port(),
            },
            database: DatabaseConfig {
                url: url.into(),
                max_connections: default_max_connections(),
                min_connections: 1,
                run_migrations: true,
                migrations_dir: default_migrations_dir(),
            },
            jwt: JwtConfig {
                secret: None,
                token_expiry: default_token_expiry(),
            },
            rate_limit: RateLimitConfig {
                replenish_seconds: default_replenish_seconds(),
                burst: default_burst(),
            },
            cors: CorsConfig {
                allowed_origins: Vec::new(),
            },
            storage: StorageConfig {
                upload_dir: None,
                public_base_url: None,
                max_upload_size_mb: default_max_upload_size(),
            },
            snowflake: SnowflakeConfig { worker_id: 0 },
            seed_rooms: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
