//! Worker error taxonomy.

use std::fmt;

use acw_storage::StorageError;
use acw_vendor::ApiError;
use serde::Serialize;
use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

/// Failure class reported to the invoking platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    SourceInvalid,
    UnsupportedInput,
    Transport,
    Vendor,
    Output,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::SourceInvalid => "source_invalid",
            ErrorKind::UnsupportedInput => "unsupported_input",
            ErrorKind::Transport => "transport",
            ErrorKind::Vendor => "vendor",
            ErrorKind::Output => "output",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Source invalid: {0}")]
    SourceInvalid(String),

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("Transport error: {0}")]
    Transport(String),

    /// Vendor-reported failure; the message carries the vendor text verbatim.
    #[error("{message}")]
    Vendor {
        code: Option<String>,
        message: String,
    },

    #[error("Output error: {0}")]
    Output(String),
}

impl WorkerError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn source_invalid(msg: impl Into<String>) -> Self {
        Self::SourceInvalid(msg.into())
    }

    pub fn unsupported_input(msg: impl Into<String>) -> Self {
        Self::UnsupportedInput(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn vendor(code: Option<String>, msg: impl Into<String>) -> Self {
        Self::Vendor {
            code,
            message: msg.into(),
        }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkerError::Configuration(_) => ErrorKind::Configuration,
            WorkerError::SourceInvalid(_) => ErrorKind::SourceInvalid,
            WorkerError::UnsupportedInput(_) => ErrorKind::UnsupportedInput,
            WorkerError::Transport(_) => ErrorKind::Transport,
            WorkerError::Vendor { .. } => ErrorKind::Vendor,
            WorkerError::Output(_) => ErrorKind::Output,
        }
    }

    pub fn vendor_code(&self) -> Option<&str> {
        match self {
            WorkerError::Vendor { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Serializable form written by the binary on failure.
    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            kind: self.kind(),
            message: self.to_string(),
            code: self.vendor_code().map(str::to_string),
        }
    }
}

/// Classified failure as reported at the invocation boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEnvelope {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl From<ApiError> for WorkerError {
    fn from(err: ApiError) -> Self {
        match err {
            transport if transport.is_transport() => WorkerError::Transport(transport.to_string()),
            ApiError::Vendor { code, message, .. } => WorkerError::Vendor { code, message },
            ApiError::SourceRejected { message, .. } => WorkerError::SourceInvalid(message),
            ApiError::Credentials(msg) => WorkerError::Configuration(msg),
            ApiError::InvalidRequest(msg) => WorkerError::UnsupportedInput(msg),
            ApiError::InvalidResponse(msg) => WorkerError::Vendor {
                code: None,
                message: msg,
            },
            other => WorkerError::Transport(other.to_string()),
        }
    }
}

impl From<StorageError> for WorkerError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConfigError(msg) => WorkerError::Configuration(msg),
            StorageError::Io(e) => WorkerError::Output(e.to_string()),
            StorageError::InvalidRequest(msg) => WorkerError::Output(msg),
            other => WorkerError::Transport(other.to_string()),
        }
    }
}

impl From<std::io::Error> for WorkerError {
    fn from(err: std::io::Error) -> Self {
        WorkerError::Output(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acw_vendor::{Downloader, HttpConfig};

    #[test]
    fn test_vendor_error_keeps_message_verbatim() {
        let api = ApiError::vendor(
            Some("InvalidImageUrl".into()),
            Some(200),
            "The Azure Analyze Image Api failed with InvalidImageUrl: bad",
        );
        let err = WorkerError::from(api);
        assert_eq!(err.kind(), ErrorKind::Vendor);
        assert_eq!(err.vendor_code(), Some("InvalidImageUrl"));
        assert_eq!(
            err.to_string(),
            "The Azure Analyze Image Api failed with InvalidImageUrl: bad"
        );
    }

    #[test]
    fn test_api_error_classes() {
        assert_eq!(
            WorkerError::from(ApiError::PollExhausted(5)).kind(),
            ErrorKind::Transport
        );
        assert_eq!(
            WorkerError::from(ApiError::credentials("bad key")).kind(),
            ErrorKind::Configuration
        );
        let corrupt = ApiError::SourceRejected {
            code: "CORRUPT_DOCUMENT".into(),
            message: "PDFServices ServiceApiError: CORRUPT_DOCUMENT".into(),
        };
        assert_eq!(WorkerError::from(corrupt).kind(), ErrorKind::SourceInvalid);
    }

    #[tokio::test]
    async fn test_network_error_is_transport() {
        let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/cat.jpg", closed.local_addr().unwrap());
        drop(closed);

        let downloader = Downloader::new(&HttpConfig::default()).unwrap();
        let api = downloader.fetch(&url).await.unwrap_err();
        assert!(matches!(api, ApiError::Network(_)));

        let err = WorkerError::from(api);
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.vendor_code().is_none());
        assert!(err.to_string().starts_with("Transport error: Network error"));
    }

    #[test]
    fn test_storage_error_classes() {
        assert_eq!(
            WorkerError::from(StorageError::config_error("FILES_S3_BUCKET not set")).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            WorkerError::from(StorageError::not_found("output/rendition.jpg")).kind(),
            ErrorKind::Transport
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        assert_eq!(WorkerError::from(StorageError::Io(io)).kind(), ErrorKind::Output);
    }

    #[test]
    fn test_envelope_serialization() {
        let envelope = WorkerError::vendor(Some("401".into()), "Sensei failed with 401").envelope();
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["kind"], "vendor");
        assert_eq!(json["code"], "401");

        let plain = WorkerError::source_invalid("Source file is empty.").envelope();
        let json = serde_json::to_value(&plain).unwrap();
        assert!(json.get("code").is_none());
        assert_eq!(json["kind"], "source_invalid");
    }
}
