//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Create room request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 64, message = "Room name must be 1-64 characters"))]
    #[schema(example = "Cozy Lo-Fi")]
    pub name: String,

    /// Free-text category tag, e.g. `lo-fi` or `focus`
    #[validate(length(min = 1, max = 32, message = "Category must be 1-32 characters"))]
    #[schema(example = "lo-fi")]
    pub category: String,
}

/// Query parameters for message history
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListMessagesQuery {
    /// Max messages to return (1-100, default 50)
    pub limit: Option<i64>,
}
