//! Message history query extractor

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use chill_service::dto::ListMessagesQuery;

use crate::response::ApiError;

/// `?limit=` for message history; clamping happens in the service
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

#[async_trait]
impl<S> FromRequestParts<S> for HistoryQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<ListMessagesQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;

        Ok(Self {
            limit: params.limit,
        })
    }
}
