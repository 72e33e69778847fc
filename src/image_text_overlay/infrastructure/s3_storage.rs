//! S3 implementation of the object storage collaborator.
//!
//! The SDK is async while the overlay pipeline is blocking, so calls are
//! driven with `Handle::block_on`. Callers must be on a blocking thread
//! (e.g. inside `spawn_blocking`), never on a runtime worker.

use super::error::{InfrastructureError, StorageError};
use crate::config::StorageConfig;
use crate::domain::object_storage_trait::ObjectStorage;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{config::Region, presigning::PresigningConfig, primitives::ByteStream, Client};
use std::path::Path;
use std::time::Duration;
use tokio::runtime::Handle;

pub struct S3ObjectStorage {
    client: Client,
    bucket: String,
    runtime: Handle,
}

impl S3ObjectStorage {
    /// Builds a client from the default AWS credential chain. Must be called inside a tokio runtime.
    pub async fn new(config: &StorageConfig) -> Result<Self, InfrastructureError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint {
            // Required for MinIO and other S3-compatible services
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        tracing::info!(bucket = %config.bucket, "S3 storage configured");
        Ok(Self::from_client(Client::from_conf(builder.build()), config.bucket.clone(), Handle::current()))
    }

    pub fn from_client(client: Client, bucket: String, runtime: Handle) -> Self {
        Self { client, bucket, runtime }
    }
}

impl ObjectStorage for S3ObjectStorage {
    fn upload(&self, local_path: &Path, key: &str) -> Result<(), StorageError> {
        let data = std::fs::read(local_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::FileNotFound(local_path.to_path_buf())
            } else {
                StorageError::Upload {
                    key: key.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        self.runtime
            .block_on(
                self.client
                    .put_object()
                    .bucket(&self.bucket)
                    .key(key)
                    .body(ByteStream::from(data))
                    .send(),
            )
            .map_err(|e| StorageError::Upload {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        tracing::info!(bucket = %self.bucket, key = %key, "upload successful");
        Ok(())
    }

    fn presign_get(&self, key: &str, ttl: Duration) -> Result<String, StorageError> {
        let presign_err = |reason: String| StorageError::Presign {
            key: key.to_string(),
            reason,
        };

        let presigning = PresigningConfig::expires_in(ttl).map_err(|e| presign_err(e.to_string()))?;
        let request = self
            .runtime
            .block_on(
                self.client
                    .get_object()
                    .bucket(&self.bucket)
                    .key(key)
                    .presigned(presigning),
            )
            .map_err(|e| presign_err(e.to_string()))?;

        Ok(request.uri().to_string())
    }
}
