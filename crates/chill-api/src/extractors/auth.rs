//! Authentication extractor
//!
//! Resolves the bearer token in the Authorization header to a user id.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chill_core::UserId;

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated user resolved from a bearer token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
}

impl AuthUser {
    /// Create a new AuthUser
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(AUTHORIZATION) {
            return Err(ApiError::MissingAuth);
        }

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InvalidAuthFormat)?;

        let app_state = AppState::from_ref(state);
        let user_id = app_state
            .service_context()
            .identity()
            .resolve(bearer.token())
            .map_err(|e| {
                tracing::warn!(error = %e, "Bearer token rejected");
                e
            })?;

        Ok(AuthUser::new(user_id))
    }
}
