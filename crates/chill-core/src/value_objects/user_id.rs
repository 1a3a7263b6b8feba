//! User ID - opaque identifier issued by the external identity provider

use std::fmt;

use serde::{Deserialize, Serialize};

/// Longest user id accepted from clients or tokens
pub const MAX_USER_ID_LENGTH: usize = 128;

/// Opaque user identifier
///
/// Users are owned by an upstream identity system; this crate never
/// interprets the id beyond equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Wrap a trusted id (e.g. one read back from the database)
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Validate an id supplied from outside
    pub fn parse(id: impl Into<String>) -> Result<Self, InvalidUserId> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(InvalidUserId::Empty);
        }
        if trimmed.len() > MAX_USER_ID_LENGTH {
            return Err(InvalidUserId::TooLong);
        }
        if trimmed.len() == id.len() {
            Ok(Self(id))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Rejected user id
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidUserId {
    #[error("user id must not be empty")]
    Empty,

    #[error("user id must be at most {MAX_USER_ID_LENGTH} characters")]
    TooLong,
}

impl TryFrom<String> for UserId {
    type Error = InvalidUserId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
