//! File store errors.

use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    /// `FILES_S3_*` incomplete or unusable
    #[error("Cloud file store is not configured: {0}")]
    ConfigError(String),

    #[error("Staged object {0} does not exist")]
    NotFound(String),

    #[error("Could not fetch staged object: {0}")]
    DownloadFailed(String),

    #[error("Could not remove staged object: {0}")]
    DeleteFailed(String),

    #[error("Could not presign staged object URL: {0}")]
    PresignFailed(String),

    /// Empty key or destination
    #[error("Invalid copy request: {0}")]
    InvalidRequest(String),

    #[error("Local file error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound(key.into())
    }

    pub fn delete_failed(msg: impl Into<String>) -> Self {
        Self::DeleteFailed(msg.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }
}
