//! Azure image tagging: categories of a remote image as JSON.

use acw_vendor::{AzureCredentials, AzureVisionClient, HttpConfig};
use async_trait::async_trait;
use serde_json::Value;

use crate::credentials;
use crate::error::{WorkerError, WorkerResult};
use crate::instructions::TaggingOptions;
use crate::normalize;
use crate::output::Artifact;
use crate::pipeline::{Invocation, RenditionWorker};
use crate::source;

pub const DURATION_METRIC: &str = "azureApiDuration";
/// Categories are written indented by one space.
const JSON_INDENT: usize = 1;

pub struct TaggingWorker {
    client: AzureVisionClient,
}

impl TaggingWorker {
    pub fn new(http: &HttpConfig) -> WorkerResult<Self> {
        Ok(Self {
            client: AzureVisionClient::new(http)?,
        })
    }
}

#[async_trait]
impl RenditionWorker for TaggingWorker {
    type Options = TaggingOptions;
    type Credentials = AzureCredentials;
    type Request = String;
    type Response = Value;

    fn duration_metric(&self) -> Option<&'static str> {
        Some(DURATION_METRIC)
    }

    fn credentials(&self, inv: &Invocation<'_>) -> WorkerResult<AzureCredentials> {
        credentials::azure(inv.params, inv.config)
    }

    async fn build_request(&self, inv: &Invocation<'_>, _options: &TaggingOptions) -> WorkerResult<String> {
        source::require_url(inv.source).map(str::to_string)
    }

    async fn call(
        &self,
        inv: &Invocation<'_>,
        options: &TaggingOptions,
        credentials: &AzureCredentials,
        image_url: String,
    ) -> WorkerResult<Value> {
        inv.logger
            .log_progress(&format!("Analyzing image with language {}", options.language));
        Ok(self
            .client
            .analyze(credentials, &image_url, &options.language)
            .await?)
    }

    fn normalize(&self, _inv: &Invocation<'_>, _options: &TaggingOptions, response: Value) -> WorkerResult<Artifact> {
        let categories = normalize::categories(&response);
        let value = serde_json::to_value(&categories)
            .map_err(|e| WorkerError::output(format!("Failed to serialize categories: {}", e)))?;
        Ok(Artifact::Json {
            value,
            indent: Some(JSON_INDENT),
        })
    }
}
