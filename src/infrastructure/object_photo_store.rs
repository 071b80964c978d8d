//! Report photo storage on any `object_store` backend (S3, local disk, memory).

use crate::application::sinks::PhotoStore;
use crate::infrastructure::config::{StorageBackend, StorageSettings};
use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::ObjectStore;
use std::sync::Arc;
use tracing::{debug, instrument};

pub struct ObjectPhotoStore {
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl ObjectPhotoStore {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
        }
    }

    /// Build the store selected by `settings.backend`.
    pub fn from_settings(settings: &StorageSettings) -> Result<Self> {
        let store: Arc<dyn ObjectStore> = match settings.backend {
            StorageBackend::Memory => Arc::new(InMemory::new()),
            StorageBackend::Local => {
                let root = settings
                    .local_root
                    .as_ref()
                    .context("storage.local_root is required for the local backend")?;
                std::fs::create_dir_all(root)
                    .with_context(|| format!("Failed to create {}", root.display()))?;
                Arc::new(LocalFileSystem::new_with_prefix(root)?)
            }
            StorageBackend::S3 => {
                let mut builder = AmazonS3Builder::from_env()
                    .with_bucket_name(&settings.bucket)
                    .with_region(&settings.region)
                    .with_allow_http(settings.allow_http);
                if let Some(endpoint) = &settings.endpoint {
                    builder = builder.with_endpoint(endpoint);
                }
                if let (Some(key), Some(secret)) =
                    (&settings.access_key_id, &settings.secret_access_key)
                {
                    builder = builder
                        .with_access_key_id(key)
                        .with_secret_access_key(secret);
                }
                Arc::new(builder.build().context("Failed to create S3 client")?)
            }
        };

        Ok(Self::new(store, settings.bucket.clone()))
    }
}

#[async_trait]
impl PhotoStore for ObjectPhotoStore {
    #[instrument(skip(self, image), fields(bucket = %self.bucket))]
    async fn put_photo(&self, key: &str, image: Bytes) -> Result<()> {
        debug!(size = image.len(), "Writing report photo");
        self.store
            .put(&Path::from(key), image.into())
            .await
            .with_context(|| format!("Failed to write {}", key))?;
        Ok(())
    }
}
