//! Rendition output writing.

use std::path::Path;
use std::sync::Arc;

use acw_storage::FileStore;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};
use tracing::debug;

use crate::error::{WorkerError, WorkerResult};
use crate::logging::InvocationLogger;
use crate::xmp::XmpDocument;

/// The single artifact written to `rendition.path`.
pub enum Artifact {
    /// JSON text, compact or indented by `indent` spaces
    Json { value: Value, indent: Option<usize> },
    Xmp(XmpDocument),
    Bytes(Vec<u8>),
    /// Object in the cloud file store; deleted after the copy
    Staged { store: Arc<dyn FileStore>, key: String },
}

impl std::fmt::Debug for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Artifact::Json { indent, .. } => f.debug_struct("Json").field("indent", indent).finish_non_exhaustive(),
            Artifact::Xmp(doc) => f.debug_tuple("Xmp").field(&doc.properties().len()).finish(),
            Artifact::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Artifact::Staged { store, key } => f
                .debug_struct("Staged")
                .field("store", &store.name())
                .field("key", key)
                .finish(),
        }
    }
}

/// Serialize JSON with an optional space indent.
pub fn json_text(value: &Value, indent: Option<usize>) -> WorkerResult<Vec<u8>> {
    match indent {
        None => serde_json::to_vec(value).map_err(|e| WorkerError::output(e.to_string())),
        Some(width) => {
            let spaces = " ".repeat(width);
            let mut buf = Vec::new();
            let mut serializer =
                Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(spaces.as_bytes()));
            value
                .serialize(&mut serializer)
                .map_err(|e| WorkerError::output(e.to_string()))?;
            Ok(buf)
        }
    }
}

/// Write `artifact` to `path`, returning the number of bytes written.
///
/// A staged object is deleted whether or not the copy succeeds.
pub async fn write_artifact(artifact: Artifact, path: &Path, logger: &InvocationLogger) -> WorkerResult<u64> {
    match artifact {
        Artifact::Json { value, indent } => write_bytes(path, &json_text(&value, indent)?).await,
        Artifact::Xmp(doc) => write_bytes(path, doc.to_xml()?.as_bytes()).await,
        Artifact::Bytes(bytes) => write_bytes(path, &bytes).await,
        Artifact::Staged { store, key } => {
            let copied = store.copy_to_local(&key, path).await;
            discard_staged(store.as_ref(), &key, logger).await;
            copied?;
            Ok(tokio::fs::metadata(path).await?.len())
        }
    }
}

/// Best-effort removal of a staged object. A failed delete is only logged.
pub async fn discard_staged(store: &dyn FileStore, key: &str, logger: &InvocationLogger) {
    match store.delete(key).await {
        Ok(()) => debug!("Deleted staged object {} from {}", key, store.name()),
        Err(e) => logger.log_warning(&format!("Failed to delete staged object {}: {}", key, e)),
    }
}

async fn write_bytes(path: &Path, bytes: &[u8]) -> WorkerResult<u64> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| WorkerError::output(format!("Failed to write {}: {}", path.display(), e)))?;
    Ok(bytes.len() as u64)
}
