//! External collaborators - object storage and tone rewriting

use async_trait::async_trait;

use super::RepoResult;

/// Blob storage for uploaded files
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key` and return the public URL
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> RepoResult<String>;

    /// Whether uploads can be accepted at all
    fn is_configured(&self) -> bool {
        true
    }
}

/// Rewrites chat content for a tone annotation
#[async_trait]
pub trait ToneTransformer: Send + Sync {
    async fn transform(&self, content: &str, tone: &str) -> RepoResult<String>;
}

/// Tone transformer that returns the content unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughTone;

#[async_trait]
impl ToneTransformer for PassThroughTone {
    async fn transform(&self, content: &str, _tone: &str) -> RepoResult<String> {
        Ok(content.to_string())
    }
}
