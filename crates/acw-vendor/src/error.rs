//! Vendor client error types.

use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS or timeout failure before a response arrived.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The vendor answered but reported an application-level failure.
    #[error("{message}")]
    Vendor {
        code: Option<String>,
        status: Option<u16>,
        message: String,
    },

    /// The vendor rejected the source content itself (e.g. a corrupt document).
    #[error("{message}")]
    SourceRejected { code: String, message: String },

    #[error("Invalid credentials: {0}")]
    Credentials(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Job did not finish after {0} status checks")]
    PollExhausted(u32),
}

impl ApiError {
    pub fn vendor(code: Option<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Vendor {
            code,
            status,
            message: message.into(),
        }
    }

    pub fn credentials(msg: impl Into<String>) -> Self {
        Self::Credentials(msg.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Vendor-supplied error code, when one was reported.
    pub fn vendor_code(&self) -> Option<&str> {
        match self {
            ApiError::Vendor { code, .. } => code.as_deref(),
            ApiError::SourceRejected { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }

    /// HTTP status of the failed response, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ApiError::Vendor { status, .. } => *status,
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True for failures that happened below the vendor application layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::PollExhausted(_))
    }
}
