//! Document Cloud PDF Services client.

use reqwest::multipart::Form;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::ServiceAccount;
use crate::error::{ApiError, ApiResult};
use crate::http::{build_client, is_json, is_usage_limit, value_text, vendor_fault, FileUpload, HttpConfig};

pub const SERVICE: &str = "PDFServices";

/// Error code reported for documents the service cannot read.
pub const CORRUPT_DOCUMENT: &str = "CORRUPT_DOCUMENT";

/// Result of one operation.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfServicesOutput {
    /// Structured result (document properties)
    Json(Value),
    /// Produced file (created, exported or compressed document)
    Binary(Vec<u8>),
}

impl PdfServicesOutput {
    pub fn len(&self) -> usize {
        match self {
            PdfServicesOutput::Json(_) => 0,
            PdfServicesOutput::Binary(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone)]
pub struct PdfServicesClient {
    http: Client,
    endpoint: String,
}

impl PdfServicesClient {
    pub fn new(config: &HttpConfig, endpoint: impl Into<String>) -> ApiResult<Self> {
        Ok(Self {
            http: build_client(config)?,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn operation_url(&self, operation: &str) -> String {
        format!("{}/operation/{}", self.endpoint, operation)
    }

    /// Run `operation` on the uploaded file.
    ///
    /// `expect_json` selects how a successful body is returned.
    pub async fn execute(
        &self,
        account: &ServiceAccount,
        operation: &str,
        options: &Value,
        file: FileUpload,
        expect_json: bool,
    ) -> ApiResult<PdfServicesOutput> {
        let assertion = account.assertion()?;
        let url = self.operation_url(operation);
        debug!("Executing {} on {} ({} bytes)", operation, file.file_name, file.len());

        let form = Form::new()
            .part("file", file.into_part()?)
            .text("options", options.to_string());

        let response = self
            .http
            .post(&url)
            .bearer_auth(assertion)
            .header("x-api-key", &account.client_id)
            .header("x-gw-ims-org-id", &account.org_id)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status.as_u16(), &body));
        }

        if expect_json || is_json(&response) {
            let body = response.text().await?;
            let json: Value = serde_json::from_str(&body).map_err(|e| {
                ApiError::invalid_response(format!("{} returned invalid JSON: {}", SERVICE, e))
            })?;
            if vendor_fault(&json).is_some() {
                return Err(classify_failure(status.as_u16(), &body));
            }
            return Ok(PdfServicesOutput::Json(json));
        }

        let bytes = response.bytes().await?;
        Ok(PdfServicesOutput::Binary(bytes.to_vec()))
    }
}

/// Map a failed operation into the usage / api / corrupt-source classes.
fn classify_failure(status: u16, body: &str) -> ApiError {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let error = parsed.as_ref().and_then(|v| v.get("error"));

    let code = error
        .and_then(|e| e.get("code"))
        .or_else(|| parsed.as_ref().and_then(|v| v.get("code")))
        .map(value_text);
    let message = error
        .and_then(|e| e.get("message"))
        .or_else(|| parsed.as_ref().and_then(|v| v.get("message")))
        .map(value_text)
        .unwrap_or_else(|| body.to_string());

    let detail = match &code {
        Some(code) => format!("{} (status {}): {}", code, status, message),
        None => format!("status {}: {}", status, message),
    };

    if is_usage_limit(status) {
        warn!("{} usage limit reached: {}", SERVICE, detail);
        return ApiError::vendor(code, Some(status), format!("{} ServiceUsageError: {}", SERVICE, detail));
    }

    let message = format!("{} ServiceApiError: {}", SERVICE, detail);
    match code {
        Some(code) if code == CORRUPT_DOCUMENT => ApiError::SourceRejected { code, message },
        code => ApiError::vendor(code, Some(status), message),
    }
}
