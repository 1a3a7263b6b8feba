//! Object store implementations

mod local;

use std::sync::Arc;

use async_trait::async_trait;
use chill_core::{DomainError, ObjectStore, RepoResult};

use crate::config::StorageConfig;

pub use local::LocalObjectStore;

/// Store used when uploads have no destination configured
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredObjectStore;

#[async_trait]
impl ObjectStore for UnconfiguredObjectStore {
    async fn put(&self, _key: &str, _bytes: Vec<u8>, _content_type: &str) -> RepoResult<String> {
        Err(DomainError::Unconfigured("Object storage"))
    }

    fn is_configured(&self) -> bool {
        false
    }
}

/// Build the object store described by the configuration
#[must_use]
pub fn object_store_from_config(config: &StorageConfig) -> Arc<dyn ObjectStore> {
    match (&config.upload_dir, &config.public_base_url) {
        (Some(dir), Some(base_url)) => Arc::new(LocalObjectStore::new(dir, base_url)),
        _ => Arc::new(UnconfiguredObjectStore),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_store() {
        let store = UnconfiguredObjectStore;
        assert!(!store.is_configured());
        let err = store.put("u/a.png", vec![1], "image/png").await.unwrap_err();
        assert!(err.is_unconfigured());
    }

    #[test]
    fn test_store_from_config() {
        let mut config = StorageConfig {
            upload_dir: Some("/tmp/chill-uploads".to_string()),
            public_base_url: None,
            max_upload_size_mb: 5,
        };
        assert!(!object_store_from_config(&config).is_configured());

        config.public_base_url = Some("http://localhost:3001/uploads".to_string());
        assert!(object_store_from_config(&config).is_configured());
    }
}
