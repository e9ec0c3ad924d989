//! Picture of the requested animal. The source asset is never read.

use acw_vendor::{Downloader, HttpConfig};
use async_trait::async_trait;

use crate::error::WorkerResult;
use crate::instructions::AnimalOptions;
use crate::output::Artifact;
use crate::pipeline::{Invocation, RenditionWorker};

pub const DURATION_METRIC: &str = "animalDownloadDuration";

pub struct AnimalWorker {
    downloader: Downloader,
}

impl AnimalWorker {
    pub fn new(http: &HttpConfig) -> WorkerResult<Self> {
        Ok(Self {
            downloader: Downloader::new(http)?,
        })
    }
}

#[async_trait]
impl RenditionWorker for AnimalWorker {
    type Options = AnimalOptions;
    type Credentials = ();
    type Request = String;
    type Response = Vec<u8>;

    fn duration_metric(&self) -> Option<&'static str> {
        Some(DURATION_METRIC)
    }

    fn credentials(&self, _inv: &Invocation<'_>) -> WorkerResult<()> {
        Ok(())
    }

    async fn build_request(&self, _inv: &Invocation<'_>, options: &AnimalOptions) -> WorkerResult<String> {
        Ok(options.url.clone())
    }

    async fn call(
        &self,
        inv: &Invocation<'_>,
        options: &AnimalOptions,
        _credentials: &(),
        url: String,
    ) -> WorkerResult<Vec<u8>> {
        inv.logger
            .log_progress(&format!("Downloading {} picture", options.animal));
        Ok(self.downloader.fetch(&url).await?)
    }

    fn normalize(&self, _inv: &Invocation<'_>, _options: &AnimalOptions, bytes: Vec<u8>) -> WorkerResult<Artifact> {
        Ok(Artifact::Bytes(bytes))
    }
}
