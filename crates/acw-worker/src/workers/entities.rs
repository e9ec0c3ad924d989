//! Named entities of a document via the Sensei entity recognizer.

use acw_models::{Entity, EntityType};
use acw_vendor::{CasResponse, ContentAnalyzerRequests, FileUpload, HttpConfig, ImsCredentials, SenseiClient};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::credentials::{self, ImsRequirement};
use crate::error::WorkerResult;
use crate::instructions::EntityOptions;
use crate::normalize;
use crate::output::Artifact;
use crate::pipeline::{Invocation, RenditionWorker};
use crate::source;
use crate::workers::color::{CCAI_NAMESPACE, CCAI_PREFIX, DURATION_METRIC};
use crate::xmp::{XmpDocument, XmpValue};

/// Content id the document is submitted and labelled under.
pub const CONTENT_ID: &str = "abc123";
const REQUEST_CONTENT_ID: &str = "test123";
const MAX_RESULTS: u32 = 10;

fn analyzer_parameters() -> Value {
    json!({
        "application-id": "1234",
        "content-type": "file",
        "encoding": "pdf",
        "threshold": 0.01,
        "top-N": MAX_RESULTS,
        "data": [{
            "content-id": CONTENT_ID,
            "content": "file"
        }]
    })
}

fn names_of(entities: &[Entity], pred: impl Fn(&EntityType) -> bool) -> Vec<String> {
    entities
        .iter()
        .filter(|e| pred(&e.entity_type))
        .map(|e| e.name.clone())
        .collect()
}

/// XMP document listing entities by type.
pub fn entities_document(entities: &[Entity]) -> XmpDocument {
    let structs: Vec<XmpValue> = entities
        .iter()
        .map(|e| {
            XmpValue::Struct(vec![
                ("ccai:name".to_string(), e.name.clone().into()),
                ("ccai:type".to_string(), e.entity_type.to_string().into()),
                ("ccai:score".to_string(), e.score.into()),
            ])
        })
        .collect();

    XmpDocument::new()
        .namespace(CCAI_PREFIX, CCAI_NAMESPACE)
        .property("ccai:entityKeyword", names_of(entities, |t| *t == EntityType::Keyword))
        .property("ccai:entityOrganization", names_of(entities, |t| *t == EntityType::Organization))
        .property("ccai:entityPerson", names_of(entities, |t| *t == EntityType::Person))
        .property("ccai:entityProduct", names_of(entities, |t| *t == EntityType::Product))
        .property("ccai:entityLocation", names_of(entities, EntityType::is_location))
        .property(
            "ccai:entityName",
            entities.iter().map(Entity::display_name).collect::<Vec<_>>(),
        )
        .property("ccai:entity", XmpValue::Seq(structs))
}

pub struct EntityWorker {
    client: SenseiClient,
}

impl EntityWorker {
    pub fn new(http: &HttpConfig) -> WorkerResult<Self> {
        Ok(Self {
            client: SenseiClient::new(http)?,
        })
    }
}

#[async_trait]
impl RenditionWorker for EntityWorker {
    type Options = EntityOptions;
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
        options: &EntityOptions,
    ) -> WorkerResult<(FileUpload, ContentAnalyzerRequests)> {
        let upload = source::read_upload(inv.source).await?;
        let requests = ContentAnalyzerRequests::single(&options.analyzer_id, analyzer_parameters())
            .with_content_id(REQUEST_CONTENT_ID);
        Ok((upload, requests))
    }

    async fn call(
        &self,
        inv: &Invocation<'_>,
        options: &EntityOptions,
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

    fn normalize(&self, _inv: &Invocation<'_>, _options: &EntityOptions, response: CasResponse) -> WorkerResult<Artifact> {
        let entities = normalize::parse_entities(&response, CONTENT_ID);
        Ok(Artifact::Xmp(entities_document(&entities)))
    }
}
