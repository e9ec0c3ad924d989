//! In-process file store used in test mode.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::error::{StorageError, StorageResult};
use crate::store::{FileStore, Permissions};

/// Content written by every copy.
pub const MOCK_CONTENT: &str = "success\n";

/// File store that never touches the network.
///
/// Copies write a fixed marker file, presigned URLs are deterministic and
/// deletions are recorded so tests can assert cleanup.
#[derive(Debug, Default)]
pub struct MockFileStore {
    deleted: Mutex<Vec<String>>,
}

impl MockFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys deleted so far.
    pub fn deleted_keys(&self) -> Vec<String> {
        self.deleted.lock().map(|d| d.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl FileStore for MockFileStore {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn presign_url(
        &self,
        key: &str,
        expires_in: Duration,
        permissions: Permissions,
    ) -> StorageResult<String> {
        let basename = Path::new(key)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(key);
        Ok(format!(
            "https://www.azureedge.net/{}/{}/{}",
            expires_in.as_secs(),
            permissions,
            basename
        ))
    }

    async fn copy_to_local(&self, key: &str, dest: &Path) -> StorageResult<()> {
        if key.is_empty() || dest.as_os_str().is_empty() {
            return Err(StorageError::invalid_request(format!(
                "source key and destination path must be provided: {:?}, {}",
                key,
                dest.display()
            )));
        }
        tokio::fs::write(dest, MOCK_CONTENT).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        info!("MockFileStore.delete called for {}", key);
        if let Ok(mut deleted) = self.deleted.lock() {
            deleted.push(key.to_string());
        }
        Ok(())
    }
}
