//! Azure Computer Vision "Analyze Image" client.

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::auth::AzureCredentials;
use crate::error::{ApiError, ApiResult};
use crate::http::{build_client, read_json, HttpConfig};

/// Service name used as the prefix of vendor error messages.
pub const SERVICE: &str = "The Azure Analyze Image Api";

const ANALYZE_PATH: &str = "vision/v3.0/analyze";
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    url: &'a str,
}

/// Client for the Analyze Image endpoint.
///
/// The image is passed by URL; Azure fetches it directly.
#[derive(Clone)]
pub struct AzureVisionClient {
    http: Client,
}

impl AzureVisionClient {
    pub fn new(config: &HttpConfig) -> ApiResult<Self> {
        Ok(Self {
            http: build_client(config)?,
        })
    }

    /// Analyze URL for an endpoint and language.
    pub fn analyze_url(endpoint: &str, language: &str) -> ApiResult<Url> {
        let base = if endpoint.ends_with('/') {
            endpoint.to_string()
        } else {
            format!("{}/", endpoint)
        };
        let mut url = Url::parse(&base)
            .and_then(|b| b.join(ANALYZE_PATH))
            .map_err(|e| ApiError::invalid_request(format!("invalid Azure endpoint {}: {}", endpoint, e)))?;
        url.query_pairs_mut()
            .append_pair("details", "Celebrities")
            .append_pair("language", language);
        Ok(url)
    }

    /// Analyze a remote image and return the raw response document.
    pub async fn analyze(
        &self,
        credentials: &AzureCredentials,
        image_url: &str,
        language: &str,
    ) -> ApiResult<Value> {
        let url = Self::analyze_url(&credentials.endpoint, language)?;
        debug!("Running Azure analyze request for {} via {}", image_url, url);

        let response = self
            .http
            .post(url)
            .header(SUBSCRIPTION_KEY_HEADER, &credentials.subscription_key)
            .json(&AnalyzeRequest { url: image_url })
            .send()
            .await?;

        read_json(response, SERVICE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials(endpoint: String) -> AzureCredentials {
        AzureCredentials {
            subscription_key: "test-azure-key".to_string(),
            endpoint,
        }
    }

    #[test]
    fn test_analyze_url_with_and_without_slash() {
        let a = AzureVisionClient::analyze_url("https://westus.api.cognitive.microsoft.com/", "en").unwrap();
        let b = AzureVisionClient::analyze_url("https://westus.api.cognitive.microsoft.com", "en").unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a.as_str(),
            "https://westus.api.cognitive.microsoft.com/vision/v3.0/analyze?details=Celebrities&language=en"
        );
    }

    #[tokio::test]
    async fn test_analyze_sends_url_and_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/vision/v3.0/analyze"))
            .and(query_param("language", "es"))
            .and(header(SUBSCRIPTION_KEY_HEADER, "test-azure-key"))
            .and(body_json(json!({"url": "https://assets/cat.jpg"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"categories": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = AzureVisionClient::new(&HttpConfig::default()).unwrap();
        let body = client
            .analyze(&credentials(server.uri()), "https://assets/cat.jpg", "es")
            .await
            .unwrap();
        assert_eq!(body, json!({"categories": []}));
    }

    #[tokio::test]
    async fn test_analyze_reports_in_body_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": "InvalidImageUrl",
                "message": "Image URL is badly formatted."
            })))
            .mount(&server)
            .await;

        let client = AzureVisionClient::new(&HttpConfig::default()).unwrap();
        let err = client
            .analyze(&credentials(server.uri()), "nope", "en")
            .await
            .unwrap_err();
        assert_eq!(err.vendor_code(), Some("InvalidImageUrl"));
        assert!(err.to_string().contains("InvalidImageUrl"));
        assert!(err.to_string().contains("Image URL is badly formatted."));
    }
}
