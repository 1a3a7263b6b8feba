//! Filesystem-backed object store

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chill_core::{DomainError, ObjectStore, RepoResult};
use tracing::{debug, instrument};

/// Writes objects below a root directory and serves them from a public base URL
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a key to a path under the root, rejecting anything that escapes it
    fn path_for(&self, key: &str) -> RepoResult<PathBuf> {
        let relative = Path::new(key);
        let safe = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if !safe {
            return Err(DomainError::StorageError(format!("invalid object key: {key}")));
        }
        Ok(self.root.join(relative))
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> RepoResult<String> {
        let path = self.path_for(key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::StorageError(e.to_string()))?;
        }

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| DomainError::StorageError(e.to_string()))?;

        debug!(path = %path.display(), "Stored object");
        Ok(self.public_url(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("chill-store-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_put_writes_file_and_returns_url() {
        let root = temp_root();
        let store = LocalObjectStore::new(&root, "http://cdn.test/uploads/");

        let url = store
            .put("u1/pic.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();

        assert_eq!(url, "http://cdn.test/uploads/u1/pic.png");
        let written = tokio::fs::read(root.join("u1/pic.png")).await.unwrap();
        assert_eq!(written, vec![1, 2, 3]);

        let _ = tokio::fs::remove_dir_all(root).await;
    }

    #[tokio::test]
    async fn test_rejects_escaping_keys() {
        let store = LocalObjectStore::new(temp_root(), "http://cdn.test");
        for key in ["../etc/passwd", "/abs.png", "", "a/../../b.png"] {
            let err = store.put(key, vec![0], "image/png").await.unwrap_err();
            assert!(matches!(err, DomainError::StorageError(_)), "key {key:?}");
        }
    }
}
