//! Photoshop API client for applying recorded actions.
//!
//! The service accepts a job, answers with a status link and writes its
//! result to the caller-supplied output URL once the job succeeds.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::auth::ImsCredentials;
use crate::error::{ApiError, ApiResult};
use crate::http::{build_client, read_json, HttpConfig};

pub const SERVICE: &str = "Photoshop API";

const ACTIONS_PATH: &str = "pie/psdService/photoshopActions";
const EXTERNAL_STORAGE: &str = "external";
const OUTPUT_TYPE: &str = "image/jpeg";

/// Status polling of an accepted job.
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_polls: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_polls: 60,
        }
    }
}

#[derive(Debug, Serialize)]
struct StorageRef<'a> {
    href: &'a str,
    storage: &'static str,
}

#[derive(Debug, Serialize)]
struct OutputRef<'a> {
    href: &'a str,
    storage: &'static str,
    #[serde(rename = "type")]
    output_type: &'static str,
}

#[derive(Debug, Serialize)]
struct ActionOptions<'a> {
    actions: Vec<StorageRef<'a>>,
}

#[derive(Debug, Serialize)]
struct ActionsRequest<'a> {
    inputs: Vec<StorageRef<'a>>,
    options: ActionOptions<'a>,
    outputs: Vec<OutputRef<'a>>,
}

#[derive(Debug, Deserialize)]
struct Link {
    href: String,
}

#[derive(Debug, Deserialize)]
struct Links {
    #[serde(rename = "self")]
    status: Link,
}

#[derive(Debug, Deserialize)]
struct Accepted {
    #[serde(rename = "_links")]
    links: Links,
}

#[derive(Debug, Clone, Deserialize)]
struct JobOutput {
    #[serde(default)]
    status: String,
    #[serde(default)]
    errors: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct JobStatus {
    #[serde(default, rename = "jobId", alias = "jobID")]
    job_id: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    outputs: Vec<JobOutput>,
}

impl JobStatus {
    /// Job-level status, falling back to the first output's status.
    fn state(&self) -> &str {
        self.status
            .as_deref()
            .or_else(|| self.outputs.first().map(|o| o.status.as_str()))
            .unwrap_or("")
    }

    fn errors(&self) -> Option<&Value> {
        self.outputs.iter().find_map(|o| o.errors.as_ref())
    }
}

/// A finished job.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoshopJob {
    pub job_id: Option<String>,
    pub status_url: String,
    pub polls: u32,
}

#[derive(Clone)]
pub struct PhotoshopClient {
    http: Client,
    endpoint: String,
    poll: PollConfig,
}

impl PhotoshopClient {
    pub fn new(config: &HttpConfig, endpoint: impl Into<String>, poll: PollConfig) -> ApiResult<Self> {
        Ok(Self {
            http: build_client(config)?,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            poll,
        })
    }

    fn authorized(&self, builder: RequestBuilder, credentials: &ImsCredentials) -> RequestBuilder {
        let builder = builder
            .bearer_auth(&credentials.access_token)
            .header("x-api-key", &credentials.client_id);
        match &credentials.org_id {
            Some(org_id) => builder.header("x-gw-ims-org-id", org_id),
            None => builder,
        }
    }

    /// Apply the action file at `action_url` to `input_url`, writing a JPEG
    /// to `output_url`. Returns once the job has succeeded.
    pub async fn apply_actions(
        &self,
        credentials: &ImsCredentials,
        input_url: &str,
        action_url: &str,
        output_url: &str,
    ) -> ApiResult<PhotoshopJob> {
        let request = ActionsRequest {
            inputs: vec![StorageRef {
                href: input_url,
                storage: EXTERNAL_STORAGE,
            }],
            options: ActionOptions {
                actions: vec![StorageRef {
                    href: action_url,
                    storage: EXTERNAL_STORAGE,
                }],
            },
            outputs: vec![OutputRef {
                href: output_url,
                storage: EXTERNAL_STORAGE,
                output_type: OUTPUT_TYPE,
            }],
        };

        let url = format!("{}/{}", self.endpoint, ACTIONS_PATH);
        debug!("Submitting photoshop actions job to {}", url);

        let response = self
            .authorized(self.http.post(&url), credentials)
            .json(&request)
            .send()
            .await?;
        let accepted: Accepted = serde_json::from_value(read_json(response, SERVICE).await?)
            .map_err(|e| ApiError::invalid_response(format!("{} job has no status link: {}", SERVICE, e)))?;

        self.wait_for(credentials, accepted.links.status.href).await
    }

    async fn wait_for(&self, credentials: &ImsCredentials, status_url: String) -> ApiResult<PhotoshopJob> {
        for poll in 1..=self.poll.max_polls {
            let response = self
                .authorized(self.http.get(&status_url), credentials)
                .send()
                .await?;
            let status: JobStatus = serde_json::from_value(read_json(response, SERVICE).await?)
                .map_err(|e| ApiError::invalid_response(format!("{} status: {}", SERVICE, e)))?;

            match status.state() {
                "succeeded" => {
                    info!("Photoshop job finished after {} status checks", poll);
                    return Ok(PhotoshopJob {
                        job_id: status.job_id,
                        status_url,
                        polls: poll,
                    });
                }
                "failed" => {
                    let errors = status.errors().cloned().unwrap_or(Value::Null);
                    let code = errors.get("code").map(crate::http::value_text);
                    return Err(ApiError::vendor(
                        code,
                        None,
                        format!("{} job failed: {}", SERVICE, errors),
                    ));
                }
                other => {
                    debug!("Photoshop job status '{}' (check {})", other, poll);
                    tokio::time::sleep(self.poll.interval).await;
                }
            }
        }

        Err(ApiError::PollExhausted(self.poll.max_polls))
    }
}
