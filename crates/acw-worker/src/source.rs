//! Source asset validation and upload preparation.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use acw_models::SourceAsset;
use acw_vendor::FileUpload;
use tracing::debug;

use crate::error::{WorkerError, WorkerResult};

/// Local source file that passed validation.
#[derive(Debug, Clone)]
pub struct LocalSource {
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

/// Stat the local source file: missing or unreadable sources are rejected.
pub async fn stat_local(source: &SourceAsset) -> WorkerResult<LocalSource> {
    let path = source
        .local_path()
        .ok_or_else(|| WorkerError::source_invalid("Source file is missing."))?;

    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(WorkerError::source_invalid("Source file is missing."));
        }
        Err(e) => {
            debug!("Cannot stat {}: {}", path.display(), e);
            return Err(WorkerError::source_invalid("Source file is not accessible"));
        }
    };

    if !metadata.is_file() {
        return Err(WorkerError::source_invalid("Source file is not accessible"));
    }

    Ok(LocalSource {
        path: path.to_path_buf(),
        size: metadata.len(),
        modified: metadata.modified().ok(),
    })
}

/// Validate a source that will be uploaded: it must also be non-empty.
pub async fn validate_upload(source: &SourceAsset) -> WorkerResult<LocalSource> {
    let local = stat_local(source).await?;
    if local.size == 0 {
        return Err(WorkerError::source_invalid("Source file is empty."));
    }
    Ok(local)
}

/// Read a validated source into a multipart upload.
pub async fn read_upload(source: &SourceAsset) -> WorkerResult<FileUpload> {
    let local = validate_upload(source).await?;
    let bytes = tokio::fs::read(&local.path)
        .await
        .map_err(|_| WorkerError::source_invalid("Source file is not accessible"))?;

    let file_name = local
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| source.name.clone());

    Ok(FileUpload::new(file_name, mime_type(&local.path), bytes))
}

/// Source URL for pass-through vendors.
pub fn require_url(source: &SourceAsset) -> WorkerResult<&str> {
    source
        .remote_url()
        .ok_or_else(|| WorkerError::source_invalid("Source URL is missing."))
}

/// MIME type from the file extension.
pub fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "psd" => "image/vnd.adobe.photoshop",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "rtf" => "application/rtf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}
