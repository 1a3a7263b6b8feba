//! Identity resolver port
//!
//! Maps a bearer credential to a stable user id. The REST extractor and the
//! gateway's register-connection both go through this trait.

use chill_core::UserId;

use crate::error::AppError;

/// Resolves a bearer token to a user id
pub trait IdentityResolver: Send + Sync {
    /// # Errors
    /// `InvalidToken` / `TokenExpired` for bad credentials, `Unconfigured`
    /// when the resolver cannot verify anything.
    fn resolve(&self, token: &str) -> Result<UserId, AppError>;
}

/// Resolver used when no JWT secret is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredIdentity;

impl IdentityResolver for UnconfiguredIdentity {
    fn resolve(&self, _token: &str) -> Result<UserId, AppError> {
        Err(AppError::unconfigured("Identity provider"))
    }
}
