//! Invocation executor.
//!
//! Dispatches one invocation document to the worker named by its `worker`
//! field and records the outcome.

use std::sync::Arc;

use acw_models::{InvocationParams, Rendition, SourceAsset, WorkerKind};
use acw_storage::{FileStore, MockFileStore, S3FileStore};
use acw_vendor::{PdfServicesClient, PhotoshopClient};
use serde::Deserialize;
use tracing::{debug, Instrument};

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::InvocationLogger;
use crate::metrics;
use crate::pipeline::{run, Invocation, Outcome};
use crate::workers::{
    AnimalWorker, ColorWorker, EntityWorker, MetadataWorker, PdfWorker, PhotoshopWorker, TaggingWorker,
};

/// One invocation as handed over by the hosting runtime.
#[derive(Debug, Deserialize)]
pub struct InvocationRequest {
    pub worker: WorkerKind,
    #[serde(default)]
    pub source: SourceAsset,
    pub rendition: Rendition,
    #[serde(default)]
    pub params: InvocationParams,
}

/// Runs invocations against a fixed configuration.
pub struct RenditionExecutor {
    config: WorkerConfig,
    file_store: Option<Arc<dyn FileStore>>,
}

impl RenditionExecutor {
    /// Create a new executor.
    pub fn new(config: WorkerConfig) -> Self {
        Self {
            config,
            file_store: None,
        }
    }

    /// Use `store` for staged vendor outputs instead of the configured one.
    pub fn with_file_store(mut self, store: Arc<dyn FileStore>) -> Self {
        self.file_store = Some(store);
        self
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    fn file_store(&self) -> WorkerResult<Arc<dyn FileStore>> {
        if let Some(store) = &self.file_store {
            return Ok(Arc::clone(store));
        }
        if self.config.test_mode.is_enabled() {
            debug!("Test mode: using mock file store");
            return Ok(Arc::new(MockFileStore::new()));
        }
        let s3 = self.config.file_store.clone().ok_or_else(|| {
            WorkerError::configuration("Cloud file store is not configured (FILES_S3_*)")
        })?;
        Ok(Arc::new(S3FileStore::new(s3)))
    }

    /// Execute one invocation.
    pub async fn execute(&self, request: &InvocationRequest) -> WorkerResult<Outcome> {
        let logger = InvocationLogger::new(request.worker);
        let span = logger.create_span();
        self.execute_with_logger(request, &logger).instrument(span).await
    }

    async fn execute_with_logger(
        &self,
        request: &InvocationRequest,
        logger: &InvocationLogger,
    ) -> WorkerResult<Outcome> {
        logger.log_start(&format!("rendition {}", request.rendition.path.display()));

        let inv = Invocation {
            source: &request.source,
            rendition: &request.rendition,
            params: &request.params,
            config: &self.config,
            logger,
        };

        let result = self.dispatch(request.worker, &inv).await;
        match &result {
            Ok(outcome) => {
                metrics::record_invocation(request.worker, "success");
                logger.log_completion(&format!(
                    "{} bytes written in {:?} vendor time",
                    outcome.bytes_written, outcome.call_duration
                ));
            }
            Err(e) => {
                metrics::record_invocation(request.worker, e.kind().as_str());
                logger.log_error(&e.to_string());
            }
        }
        result
    }

    async fn dispatch(&self, worker: WorkerKind, inv: &Invocation<'_>) -> WorkerResult<Outcome> {
        let http = &self.config.http;
        match worker {
            WorkerKind::AzureTagging => run(&TaggingWorker::new(http)?, inv).await,
            WorkerKind::CcaiColor => run(&ColorWorker::new(http)?, inv).await,
            WorkerKind::CcaiEntities => run(&EntityWorker::new(http)?, inv).await,
            WorkerKind::PdfServices => {
                let client = PdfServicesClient::new(http, self.config.pdf_services_endpoint.as_str())?;
                run(&PdfWorker::new(client), inv).await
            }
            WorkerKind::PhotoshopActions => {
                let client = PhotoshopClient::new(
                    http,
                    self.config.photoshop_endpoint.as_str(),
                    self.config.photoshop_poll.clone(),
                )?;
                run(&PhotoshopWorker::new(client, self.file_store()?), inv).await
            }
            WorkerKind::Metadata => run(&MetadataWorker, inv).await,
            WorkerKind::AnimalPictures => run(&AnimalWorker::new(http)?, inv).await,
        }
    }
}
