//! User summary - display fields of an externally owned user

use crate::value_objects::UserId;

/// Read-only view of a user, attached to participants and messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: UserId,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl UserSummary {
    /// Create a summary that only knows the id
    pub fn anonymous(id: UserId) -> Self {
        Self {
            id,
            username: None,
            display_name: None,
            avatar_url: None,
        }
    }

    /// Best label to show for this user
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or_else(|| self.id.as_str())
    }
}
