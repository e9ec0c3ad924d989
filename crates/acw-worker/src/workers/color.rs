//! Dominant colors of an image via the Sensei color histogram analyzer.

use acw_vendor::{CasResponse, ContentAnalyzerRequests, FileUpload, HttpConfig, ImsCredentials, SenseiClient};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::credentials::{self, ImsRequirement};
use crate::error::WorkerResult;
use crate::instructions::ColorOptions;
use crate::normalize;
use crate::output::Artifact;
use crate::pipeline::{Invocation, RenditionWorker};
use crate::source;
use crate::xmp::XmpDocument;

pub const CCAI_PREFIX: &str = "ccai";
pub const CCAI_NAMESPACE: &str = "https://example.com/schema/ccai";
pub const DURATION_METRIC: &str = "senseiApiDuration";

/// Analyzer parameters for the source extension (`.jpg`, `.png`, ...).
///
/// A replacement from `SENSEI_PARAMS` keeps its own values apart from the two
/// `encoding` fields.
pub fn analyzer_parameters(extension: &str, replacement: Option<&Value>) -> Value {
    let mut parameters = match replacement {
        Some(custom) => custom.clone(),
        None => json!({
            "application-id": "1234",
            "content-type": "inline",
            "encoding": extension,
            "threshold": "0",
            "top-N": "0",
            "custom": {},
            "data": [{
                "content-id": "0987",
                "content": "inline-image",
                "content-type": "inline",
                "encoding": extension,
                "threshold": "0",
                "top-N": "0",
                "historic-metadata": [],
                "custom": {"exclude_mask": 1}
            }]
        }),
    };

    if let Some(obj) = parameters.as_object_mut() {
        obj.insert("encoding".into(), Value::from(extension));
    }
    if let Some(first) = parameters
        .get_mut("data")
        .and_then(Value::as_array_mut)
        .and_then(|data| data.first_mut())
        .and_then(Value::as_object_mut)
    {
        first.insert("encoding".into(), Value::from(extension));
    }
    parameters
}

pub struct ColorWorker {
    client: SenseiClient,
}

impl ColorWorker {
    pub fn new(http: &HttpConfig) -> WorkerResult<Self> {
        Ok(Self {
            client: SenseiClient::new(http)?,
        })
    }
}

#[async_trait]
impl RenditionWorker for ColorWorker {
    type Options = ColorOptions;
    type Credentials = ImsCredentials;
    type Request = (FileUpload, ContentAnalyzerRequests);
    type Response = CasResponse;

    fn duration_metric(&self) -> Option<&'static str> {
        Some(DURATION_METRIC)
    }

    fn credentials(&self, inv: &Invocation<'_>) -> WorkerResult<ImsCredentials> {
        credentials::ims(inv.params, inv.config, ImsRequirement::Token)
    }

    async fn build_request(
        &self,
        inv: &Invocation<'_>,
        options: &ColorOptions,
    ) -> WorkerResult<(FileUpload, ContentAnalyzerRequests)> {
        let upload = source::read_upload(inv.source).await?;
        let parameters = analyzer_parameters(&inv.source.extension(), options.parameters.as_ref());
        Ok((upload, ContentAnalyzerRequests::single(&options.analyzer_id, parameters)))
    }

    async fn call(
        &self,
        inv: &Invocation<'_>,
        options: &ColorOptions,
        credentials: &ImsCredentials,
        request: (FileUpload, ContentAnalyzerRequests),
    ) -> WorkerResult<CasResponse> {
        let (upload, requests) = request;
        inv.logger.log_progress(&format!(
            "Using analyzer {} at {}",
            options.analyzer_id, options.endpoint
        ));
        Ok(self
            .client
            .predict(&options.endpoint, credentials, upload, &requests)
            .await?)
    }

    fn normalize(&self, _inv: &Invocation<'_>, _options: &ColorOptions, response: CasResponse) -> WorkerResult<Artifact> {
        let colors = normalize::parse_colors(&response);

        let doc = XmpDocument::new()
            .namespace(CCAI_PREFIX, CCAI_NAMESPACE)
            .property(
                "ccai:colorNames",
                colors.iter().map(|c| c.name.clone()).collect::<Vec<_>>(),
            )
            .property(
                "ccai:colorPercentages",
                colors.iter().map(|c| c.percentage_string()).collect::<Vec<_>>(),
            )
            .property(
                "ccai:colorRGB",
                colors.iter().map(|c| c.to_web_color()).collect::<Vec<_>>(),
            );
        Ok(Artifact::Xmp(doc))
    }
}
