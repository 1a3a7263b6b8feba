//! User database model

use sqlx::FromRow;

/// Display projection of the users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: String,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}
