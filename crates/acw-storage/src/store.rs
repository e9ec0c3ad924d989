//! File store abstraction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::StorageResult;

/// Access granted by a presigned URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permissions {
    Read,
    Write,
    ReadWriteDelete,
}

impl Permissions {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permissions::Read => "r",
            Permissions::Write => "w",
            Permissions::ReadWriteDelete => "rwd",
        }
    }

    /// Whether a vendor will upload through the URL.
    pub fn allows_write(&self) -> bool {
        !matches!(self, Permissions::Read)
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cloud storage where vendors drop intermediate results.
///
/// Keys are store-relative paths such as `output/rendition.jpg`.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Generate a presigned URL a vendor can read from or write to.
    async fn presign_url(
        &self,
        key: &str,
        expires_in: Duration,
        permissions: Permissions,
    ) -> StorageResult<String>;

    /// Copy a stored object to a local file.
    async fn copy_to_local(&self, key: &str, dest: &Path) -> StorageResult<()>;

    /// Delete a stored object.
    async fn delete(&self, key: &str) -> StorageResult<()>;
}
