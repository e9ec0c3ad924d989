//! PDF Services operations on a local document.

use acw_models::PdfOperation;
use acw_vendor::{FileUpload, PdfServicesClient, PdfServicesOutput, ServiceAccount};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::credentials;
use crate::error::WorkerResult;
use crate::instructions::PdfOptions;
use crate::output::Artifact;
use crate::pipeline::{Invocation, RenditionWorker};
use crate::source;

pub const DURATION_METRIC: &str = "pdfServicesApiDuration";

/// Operation options sent alongside the file.
pub fn operation_options(options: &PdfOptions) -> Value {
    match options.operation {
        PdfOperation::Export => json!({"targetFormat": options.format.as_str()}),
        _ => json!({}),
    }
}

pub struct PdfWorker {
    client: PdfServicesClient,
}

impl PdfWorker {
    pub fn new(client: PdfServicesClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RenditionWorker for PdfWorker {
    type Options = PdfOptions;
    type Credentials = ServiceAccount;
    type Request = FileUpload;
    type Response = PdfServicesOutput;

    fn duration_metric(&self) -> Option<&'static str> {
        Some(DURATION_METRIC)
    }

    fn credentials(&self, inv: &Invocation<'_>) -> WorkerResult<ServiceAccount> {
        credentials::service_account(inv.params, inv.config)
    }

    async fn build_request(&self, inv: &Invocation<'_>, _options: &PdfOptions) -> WorkerResult<FileUpload> {
        source::read_upload(inv.source).await
    }

    async fn call(
        &self,
        inv: &Invocation<'_>,
        options: &PdfOptions,
        account: &ServiceAccount,
        upload: FileUpload,
    ) -> WorkerResult<PdfServicesOutput> {
        inv.logger.log_progress(&format!("Running {}", options.operation));
        Ok(self
            .client
            .execute(
                account,
                options.operation.as_str(),
                &operation_options(options),
                upload,
                options.operation.returns_json(),
            )
            .await?)
    }

    fn normalize(
        &self,
        _inv: &Invocation<'_>,
        _options: &PdfOptions,
        response: PdfServicesOutput,
    ) -> WorkerResult<Artifact> {
        Ok(match response {
            PdfServicesOutput::Json(value) => Artifact::Json { value, indent: None },
            PdfServicesOutput::Binary(bytes) => Artifact::Bytes(bytes),
        })
    }
}
