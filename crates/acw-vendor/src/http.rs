//! Shared HTTP plumbing: client construction, uploads and error classification.

use std::time::Duration;

use reqwest::multipart::Part;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// HTTP client settings shared by all vendor clients.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Whole-request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Build a reqwest client from the shared settings.
pub fn build_client(config: &HttpConfig) -> ApiResult<Client> {
    Client::builder()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(concat!("acw-vendor/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(ApiError::Network)
}

/// Local file content sent as a multipart `file` part.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn into_part(self) -> ApiResult<Part> {
        Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime_type)
            .map_err(|e| {
                ApiError::invalid_request(format!("Invalid MIME type '{}': {}", self.mime_type, e))
            })
    }
}

// =============================================================================
// Error classification
// =============================================================================

/// Application-level failure reported inside a response body.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorFault {
    pub code: Option<String>,
    pub detail: String,
}

impl VendorFault {
    /// Format as `"<service> failed with <code>: <detail>"`.
    pub fn into_error(self, service: &str, status: Option<u16>) -> ApiError {
        let message = match (&self.code, self.detail.is_empty()) {
            (Some(code), false) => format!("{} failed with {}: {}", service, code, self.detail),
            (Some(code), true) => format!("{} failed with {}", service, code),
            (None, _) => format!("{} failed: {}", service, self.detail),
        };
        ApiError::vendor(self.code, status, message)
    }
}

/// JSON truthiness: null, false, 0, "" and missing are not errors.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Strings verbatim, anything else as compact JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Detect a top-level `code` or `error` field.
pub fn vendor_fault(body: &Value) -> Option<VendorFault> {
    let code_field = body.get("code").filter(|v| is_truthy(v));
    let error_field = body.get("error").filter(|v| is_truthy(v));
    if code_field.is_none() && error_field.is_none() {
        return None;
    }

    let code = code_field.map(value_text).or_else(|| {
        error_field
            .and_then(|e| e.get("code"))
            .filter(|v| is_truthy(v))
            .map(value_text)
    });

    let detail = match error_field {
        Some(error) => value_text(error),
        None => body.get("message").map(value_text).unwrap_or_default(),
    };

    Some(VendorFault { code, detail })
}

/// Classify a non-2xx response.
pub fn error_from_status(service: &str, status: u16, body: &str) -> ApiError {
    let parsed = serde_json::from_str::<Value>(body).ok();
    match parsed.as_ref().and_then(vendor_fault) {
        Some(fault) => fault.into_error(service, Some(status)),
        None => ApiError::vendor(
            None,
            Some(status),
            format!("{} returned {}: {}", service, status, body),
        ),
    }
}

/// Read a JSON response, classifying HTTP and in-body failures.
pub async fn read_json(response: Response, service: &str) -> ApiResult<Value> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(error_from_status(service, status.as_u16(), &body));
    }

    let json: Value = serde_json::from_str(&body).map_err(|e| {
        ApiError::invalid_response(format!("{} returned invalid JSON: {}", service, e))
    })?;

    if let Some(fault) = vendor_fault(&json) {
        return Err(fault.into_error(service, Some(status.as_u16())));
    }

    Ok(json)
}

/// Fail on non-2xx, returning the response otherwise.
pub async fn ensure_success(response: Response, service: &str) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(error_from_status(service, status.as_u16(), &body))
}

/// True when a successful response declares a JSON body.
pub fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false)
}

/// HTTP 429 marks exhausted usage quotas.
pub fn is_usage_limit(status: u16) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS.as_u16()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_fault_on_plain_body() {
        assert!(vendor_fault(&json!({"categories": []})).is_none());
        assert!(vendor_fault(&json!({"code": null, "error": ""})).is_none());
        assert!(vendor_fault(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_top_level_code() {
        let fault = vendor_fault(&json!({"code": "InvalidImageUrl", "message": "Bad url"})).unwrap();
        assert_eq!(fault.code.as_deref(), Some("InvalidImageUrl"));
        assert_eq!(fault.detail, "Bad url");
    }

    #[test]
    fn test_nested_error_object() {
        let body = json!({"error": {"code": "FailedToProcess", "message": "Could not extract image features"}});
        let fault = vendor_fault(&body).unwrap();
        assert_eq!(fault.code.as_deref(), Some("FailedToProcess"));
        assert!(fault.detail.contains("Could not extract image features"));

        let err = fault.into_error("The Azure Analyze Image Api", Some(200));
        assert!(err
            .to_string()
            .starts_with("The Azure Analyze Image Api failed with FailedToProcess: "));
    }

    #[test]
    fn test_error_string_verbatim() {
        let fault = vendor_fault(&json!({"error": "quota exhausted"})).unwrap();
        assert_eq!(fault.code, None);
        let err = fault.into_error("Sensei", None);
        assert_eq!(err.to_string(), "Sensei failed: quota exhausted");
    }

    #[test]
    fn test_numeric_code() {
        let fault = vendor_fault(&json!({"code": 401})).unwrap();
        assert_eq!(fault.code.as_deref(), Some("401"));
    }

    #[test]
    fn test_error_from_status_plain_text() {
        let err = error_from_status("Sensei", 503, "upstream down");
        assert_eq!(err.http_status(), Some(503));
        assert_eq!(err.to_string(), "Sensei returned 503: upstream down");
    }

    #[test]
    fn test_error_from_status_json_body() {
        let err = error_from_status(
            "PDF Services",
            400,
            r#"{"error":{"code":"BAD_PDF","message":"nope"}}"#,
        );
        assert_eq!(err.vendor_code(), Some("BAD_PDF"));
    }

    #[test]
    fn test_upload_helpers() {
        let upload = FileUpload::new("a.pdf", "application/pdf", vec![1, 2, 3]);
        assert_eq!(upload.len(), 3);
        assert!(!upload.is_empty());
        assert!(is_usage_limit(429));
    }
}
