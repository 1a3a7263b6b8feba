//! Upload service
//!
//! Stores editor images in the configured object store.

use chill_core::{DomainError, UserId};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::UploadResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Content types accepted for image uploads, with their file extension
const ALLOWED_IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

/// Upload service
pub struct UploadService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UploadService<'a> {
    /// Create a new UploadService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Store an image under `{user}/{uuid}.{ext}` and return its public URL
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_image(
        &self,
        user_id: &UserId,
        filename: Option<&str>,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> ServiceResult<UploadResponse> {
        let store = self.ctx.object_store();
        if !store.is_configured() {
            return Err(DomainError::Unconfigured("Object storage").into());
        }

        let content_type = content_type
            .map(|ct| ct.trim().to_ascii_lowercase())
            .unwrap_or_default();
        let type_ext = ALLOWED_IMAGE_TYPES
            .iter()
            .find(|(ct, _)| *ct == content_type)
            .map(|(_, ext)| *ext)
            .ok_or_else(|| {
                ServiceError::validation("Only image files are allowed (jpeg, jpg, png, gif, webp)")
            })?;

        if bytes.is_empty() {
            return Err(ServiceError::validation("No image file provided"));
        }

        let max = self.ctx.max_upload_bytes();
        if bytes.len() > max {
            return Err(ServiceError::validation(format!(
                "File too large: max {} MB",
                max / (1024 * 1024)
            )));
        }

        let ext = filename
            .and_then(extension_of)
            .unwrap_or_else(|| type_ext.to_string());
        let key = format!("{}/{}.{ext}", key_segment(user_id), Uuid::new_v4());

        let url = store.put(&key, bytes, &content_type).await?;

        info!(user_id = %user_id, key = %key, "Image uploaded");

        Ok(UploadResponse::new(url))
    }
}

/// Lowercased alphanumeric extension of a file name
fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// User ids are opaque, so keep only characters that are safe in a path
fn key_segment(user_id: &UserId) -> String {
    user_id
        .as_str()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
