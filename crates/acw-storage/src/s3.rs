//! S3-compatible file store.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{Builder, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};
use crate::store::{FileStore, Permissions};

/// Configuration for the S3 file store.
#[derive(Clone)]
pub struct S3Config {
    /// S3 API endpoint URL
    pub endpoint_url: String,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Bucket name
    pub bucket_name: String,
    /// Region ("auto" for most S3-compatible providers)
    pub region: String,
}

impl std::fmt::Debug for S3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Config")
            .field("endpoint_url", &self.endpoint_url)
            .field("bucket_name", &self.bucket_name)
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl S3Config {
    /// Create config from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self {
            endpoint_url: std::env::var("FILES_S3_ENDPOINT_URL")
                .map_err(|_| StorageError::config_error("FILES_S3_ENDPOINT_URL not set"))?,
            access_key_id: std::env::var("FILES_S3_ACCESS_KEY_ID")
                .map_err(|_| StorageError::config_error("FILES_S3_ACCESS_KEY_ID not set"))?,
            secret_access_key: std::env::var("FILES_S3_SECRET_ACCESS_KEY")
                .map_err(|_| StorageError::config_error("FILES_S3_SECRET_ACCESS_KEY not set"))?,
            bucket_name: std::env::var("FILES_S3_BUCKET")
                .map_err(|_| StorageError::config_error("FILES_S3_BUCKET not set"))?,
            region: std::env::var("FILES_S3_REGION").unwrap_or_else(|_| "auto".to_string()),
        })
    }
}

/// File store backed by an S3-compatible bucket.
#[derive(Clone)]
pub struct S3FileStore {
    client: Client,
    bucket: String,
}

impl S3FileStore {
    /// Create a new store from configuration.
    pub fn new(config: S3Config) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "acw-files",
        );

        let sdk_config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint_url)
            .region(Region::new(config.region))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(sdk_config),
            bucket: config.bucket_name,
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self::new(S3Config::from_env()?))
    }
}

#[async_trait]
impl FileStore for S3FileStore {
    fn name(&self) -> &'static str {
        "s3"
    }

    async fn presign_url(
        &self,
        key: &str,
        expires_in: Duration,
        permissions: Permissions,
    ) -> StorageResult<String> {
        let presign_config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::PresignFailed(e.to_string()))?;

        let presigned = if permissions.allows_write() {
            self.client
                .put_object()
                .bucket(&self.bucket)
                .key(key)
                .presigned(presign_config)
                .await
                .map_err(|e| StorageError::PresignFailed(e.to_string()))?
        } else {
            self.client
                .get_object()
                .bucket(&self.bucket)
                .key(key)
                .presigned(presign_config)
                .await
                .map_err(|e| StorageError::PresignFailed(e.to_string()))?
        };

        debug!("Presigned {} URL for {}", permissions, key);
        Ok(presigned.uri().to_string())
    }

    async fn copy_to_local(&self, key: &str, dest: &Path) -> StorageResult<()> {
        debug!("Downloading {} to {}", key, dest.display());

        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.to_string().contains("NoSuchKey") {
                    StorageError::not_found(key)
                } else {
                    StorageError::DownloadFailed(e.to_string())
                }
            })?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?
            .into_bytes();

        tokio::fs::write(dest, &bytes).await?;

        info!("Copied {} ({} bytes) to {}", key, bytes.len(), dest.display());
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        debug!("Deleting {}", key);

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::delete_failed(e.to_string()))?;

        Ok(())
    }
}
