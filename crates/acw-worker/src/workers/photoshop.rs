//! Photoshop actions applied to a remote image.
//!
//! The vendor writes its result to a presigned URL in the cloud file store;
//! the staged object is copied to the rendition and then deleted.

use std::sync::Arc;

use acw_storage::{FileStore, Permissions};
use acw_vendor::{ImsCredentials, PhotoshopClient, PhotoshopJob};
use async_trait::async_trait;

use crate::credentials::{self, ImsRequirement};
use crate::error::WorkerResult;
use crate::instructions::PhotoshopOptions;
use crate::output::{discard_staged, Artifact};
use crate::pipeline::{Invocation, RenditionWorker};
use crate::source;

pub const DURATION_METRIC: &str = "photoshopApiDuration";

/// Cloud store key the vendor writes the result to.
pub fn staged_key(invocation_id: &str) -> String {
    format!("output/{}/rendition.jpg", invocation_id)
}

fn job_summary(job: &PhotoshopJob) -> String {
    format!(
        "Photoshop job {} succeeded after {} polls",
        job.job_id.as_deref().unwrap_or("-"),
        job.polls
    )
}

/// Input URL plus the staged key and its presigned write URL.
pub struct StagedRequest {
    pub input_url: String,
    pub key: String,
    pub output_url: String,
}

pub struct PhotoshopWorker {
    client: PhotoshopClient,
    store: Arc<dyn FileStore>,
}

impl PhotoshopWorker {
    pub fn new(client: PhotoshopClient, store: Arc<dyn FileStore>) -> Self {
        Self { client, store }
    }
}

#[async_trait]
impl RenditionWorker for PhotoshopWorker {
    type Options = PhotoshopOptions;
    type Credentials = ImsCredentials;
    type Request = StagedRequest;
    type Response = String;

    fn duration_metric(&self) -> Option<&'static str> {
        Some(DURATION_METRIC)
    }

    fn credentials(&self, inv: &Invocation<'_>) -> WorkerResult<ImsCredentials> {
        credentials::ims(inv.params, inv.config, ImsRequirement::TokenAndOrg)
    }

    async fn build_request(&self, inv: &Invocation<'_>, _options: &PhotoshopOptions) -> WorkerResult<StagedRequest> {
        let input_url = source::require_url(inv.source)?.to_string();
        let key = staged_key(inv.logger.invocation_id());
        let output_url = self
            .store
            .presign_url(&key, inv.config.presign_ttl, Permissions::ReadWriteDelete)
            .await?;
        Ok(StagedRequest {
            input_url,
            key,
            output_url,
        })
    }

    async fn call(
        &self,
        inv: &Invocation<'_>,
        options: &PhotoshopOptions,
        credentials: &ImsCredentials,
        request: StagedRequest,
    ) -> WorkerResult<String> {
        inv.logger
            .log_progress(&format!("Applying actions from {}", options.action_url));
        match self
            .client
            .apply_actions(credentials, &request.input_url, &options.action_url, &request.output_url)
            .await
        {
            Ok(job) => {
                inv.logger.log_progress(&job_summary(&job));
                Ok(request.key)
            }
            Err(e) => {
                discard_staged(self.store.as_ref(), &request.key, inv.logger).await;
                Err(e.into())
            }
        }
    }

    fn normalize(&self, _inv: &Invocation<'_>, _options: &PhotoshopOptions, key: String) -> WorkerResult<Artifact> {
        Ok(Artifact::Staged {
            store: Arc::clone(&self.store),
            key,
        })
    }
}
