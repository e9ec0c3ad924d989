//! Cloud file store used for staged vendor outputs.
//!
//! This crate provides:
//! - The `FileStore` trait (presigned URLs, copy to local file, delete)
//! - An S3-compatible implementation
//! - An in-process mock used in test mode

pub mod error;
pub mod mock;
pub mod s3;
pub mod store;

pub use error::{StorageError, StorageResult};
pub use mock::MockFileStore;
pub use s3::{S3Config, S3FileStore};
pub use store::{FileStore, Permissions};
