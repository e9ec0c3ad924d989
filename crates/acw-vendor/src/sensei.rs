//! Sensei content analyzer client and response document.
//!
//! The analyzer answers with a `cas_responses` list. Each entry carries a
//! nested feature tree where leaves hold scalar values and inner nodes hold
//! further features, e.g.
//!
//! ```json
//! {"cas_responses": [{"status": 200, "result": {"response_type": "feature",
//!   "response": [{"feature_name": "color", "feature_value": [
//!     {"feature_name": "", "feature_value": "Purple,0.59,169,9,254"}]}]}}]}
//! ```

use reqwest::multipart::Form;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::ImsCredentials;
use crate::error::{ApiError, ApiResult};
use crate::http::{build_client, read_json, FileUpload, HttpConfig};

pub const SERVICE: &str = "Sensei content analyzer";

/// Response type marking a feature tree.
pub const FEATURE_RESPONSE: &str = "feature";

// =============================================================================
// Request
// =============================================================================

/// One analyzer invocation inside `contentAnalyzerRequests`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzerRequest {
    pub analyzer_id: String,
    pub parameters: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
}

/// The `contentAnalyzerRequests` form field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentAnalyzerRequests {
    pub enable_diagnostics: bool,
    pub requests: Vec<AnalyzerRequest>,
}

impl ContentAnalyzerRequests {
    /// A single analyzer request with diagnostics enabled.
    pub fn single(analyzer_id: impl Into<String>, parameters: Value) -> Self {
        Self {
            enable_diagnostics: true,
            requests: vec![AnalyzerRequest {
                analyzer_id: analyzer_id.into(),
                parameters,
                content_id: None,
            }],
        }
    }

    pub fn with_content_id(mut self, content_id: impl Into<String>) -> Self {
        let content_id = content_id.into();
        for request in &mut self.requests {
            request.content_id = Some(content_id.clone());
        }
        self
    }
}

// =============================================================================
// Response
// =============================================================================

/// Analyzer response document.
///
/// Entries and features that do not have the expected shape are dropped
/// while parsing, so an unfamiliar document reads as an empty result.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CasResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub cas_responses: Vec<CasEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CasEntry {
    #[serde(default)]
    pub status: u16,
    #[serde(default, deserialize_with = "lenient_option")]
    pub result: Option<CasResult>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CasResult {
    #[serde(default)]
    pub response_type: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub response: Vec<Feature>,
}

/// A named node of the feature tree.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Feature {
    #[serde(default)]
    pub feature_name: String,
    #[serde(default)]
    pub feature_value: FeatureValue,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum FeatureValue {
    Nested(Vec<Feature>),
    Scalar(Value),
}

impl Default for FeatureValue {
    fn default() -> Self {
        FeatureValue::Scalar(Value::Null)
    }
}

impl FeatureValue {
    pub fn children(&self) -> &[Feature] {
        match self {
            FeatureValue::Nested(children) => children,
            FeatureValue::Scalar(_) => &[],
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FeatureValue::Scalar(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Scalar(Value::Number(n)) => n.as_f64(),
            FeatureValue::Scalar(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl Feature {
    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&Feature> {
        self.feature_value
            .children()
            .iter()
            .find(|f| f.feature_name == name)
    }
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            warn!("Ignoring {} where a list was expected", other);
            return Ok(Vec::new());
        }
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("Skipping unexpected analyzer entry: {}", e);
                None
            }
        })
        .collect())
}

fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value)
        .map_err(|e| warn!("Skipping unexpected analyzer result: {}", e))
        .ok())
}

impl CasResponse {
    /// Feature lists of every successful `feature` entry, in response order.
    pub fn feature_sets(&self) -> impl Iterator<Item = &[Feature]> {
        self.cas_responses.iter().filter_map(|entry| {
            let result = entry.result.as_ref()?;
            (entry.status == 200 && result.response_type == FEATURE_RESPONSE)
                .then_some(result.response.as_slice())
        })
    }

    /// Top-level features with a given name across all feature sets.
    pub fn features_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Feature> + 'a {
        self.feature_sets()
            .flat_map(|set| set.iter())
            .filter(move |f| f.feature_name == name)
    }
}

// =============================================================================
// Client
// =============================================================================

#[derive(Clone)]
pub struct SenseiClient {
    http: Client,
}

impl SenseiClient {
    pub fn new(config: &HttpConfig) -> ApiResult<Self> {
        Ok(Self {
            http: build_client(config)?,
        })
    }

    /// Post the file and analyzer requests to `endpoint`.
    pub async fn predict(
        &self,
        endpoint: &str,
        credentials: &ImsCredentials,
        file: FileUpload,
        requests: &ContentAnalyzerRequests,
    ) -> ApiResult<CasResponse> {
        let requests_json = serde_json::to_string(requests)
            .map_err(|e| ApiError::invalid_request(format!("contentAnalyzerRequests: {}", e)))?;

        debug!(
            "Posting {} bytes ({}) to {}",
            file.len(),
            file.file_name,
            endpoint
        );

        let form = Form::new()
            .part("file", file.into_part()?)
            .text("contentAnalyzerRequests", requests_json);

        let response = self
            .http
            .post(endpoint)
            .bearer_auth(&credentials.access_token)
            .header("x-api-key", &credentials.client_id)
            .header(reqwest::header::CACHE_CONTROL, "no-cache,no-cache")
            .multipart(form)
            .send()
            .await?;

        let body = read_json(response, SERVICE).await?;
        Ok(serde_json::from_value(body).unwrap_or_else(|e| {
            warn!("{} returned an unexpected document: {}", SERVICE, e);
            CasResponse::default()
        }))
    }
}
