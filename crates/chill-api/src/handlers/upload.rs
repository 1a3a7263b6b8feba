//! Image upload handler

use axum::{
    extract::{Multipart, State},
    Json,
};
use chill_service::dto::UploadResponse;
use chill_service::UploadService;
use utoipa::ToSchema;

use crate::extractors::AuthUser;
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Multipart field carrying the file
pub const IMAGE_FIELD: &str = "image";

/// Multipart body of `POST /api/v1/upload/image`
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadImageForm {
    /// The image file (jpeg, png, gif or webp)
    #[schema(value_type = String)]
    image: Vec<u8>,
}

/// Upload an image for the rich-text editor
#[utoipa::path(
    post,
    path = "/api/v1/upload/image",
    tag = "upload",
    request_body(content = UploadImageForm, content_type = "multipart/form-data"),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Stored", body = UploadResponse),
        (status = 400, description = "Missing, empty, oversized or non-image file"),
        (status = 401, description = "Missing or invalid token"),
        (status = 503, description = "Object storage is not configured")
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::invalid_body(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let filename = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::invalid_body(e.body_text()))?;

        let response = UploadService::new(state.service_context())
            .upload_image(
                &auth.user_id,
                filename.as_deref(),
                content_type.as_deref(),
                bytes.to_vec(),
            )
            .await?;
        return Ok(Json(response));
    }

    Err(ApiError::invalid_body(format!(
        "Missing multipart field '{IMAGE_FIELD}'"
    )))
}
