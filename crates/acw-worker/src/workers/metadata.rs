//! Local file metadata as XMP. No vendor is involved.

use acw_models::Animal;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::WorkerResult;
use crate::instructions::MetadataOptions;
use crate::output::Artifact;
use crate::pipeline::{Invocation, RenditionWorker};
use crate::source::{self, LocalSource};
use crate::xmp::XmpDocument;

pub const METADATA_PREFIX: &str = "ns1";
pub const METADATA_NAMESPACE: &str = "https://example.com/schema/worker-metadata";
/// Fixed link written as `ns1:url`.
pub const METADATA_URL: &str = "http://www.adobe.com";

#[derive(Debug, Default)]
pub struct MetadataWorker;

#[async_trait]
impl RenditionWorker for MetadataWorker {
    type Options = MetadataOptions;
    type Credentials = ();
    type Request = LocalSource;
    type Response = LocalSource;

    fn credentials(&self, _inv: &Invocation<'_>) -> WorkerResult<()> {
        Ok(())
    }

    async fn build_request(&self, inv: &Invocation<'_>, _options: &MetadataOptions) -> WorkerResult<LocalSource> {
        source::stat_local(inv.source).await
    }

    async fn call(
        &self,
        _inv: &Invocation<'_>,
        _options: &MetadataOptions,
        _credentials: &(),
        local: LocalSource,
    ) -> WorkerResult<LocalSource> {
        Ok(local)
    }

    fn normalize(&self, inv: &Invocation<'_>, options: &MetadataOptions, local: LocalSource) -> WorkerResult<Artifact> {
        let mut doc = XmpDocument::new()
            .namespace(METADATA_PREFIX, METADATA_NAMESPACE)
            .property("ns1:name", inv.source.name.as_str())
            .property(
                "ns1:supportedAnimals",
                Animal::ALL.iter().map(Animal::as_str).collect::<Vec<_>>(),
            )
            .property("ns1:filesize", local.size);
        if let Some(modified) = local.modified {
            doc = doc.property("ns1:date", DateTime::<Utc>::from(modified));
        }
        doc = doc
            .property("ns1:requestedAnimal", options.animal.as_str())
            .property("ns1:url", METADATA_URL);
        Ok(Artifact::Xmp(doc))
    }
}
