//! Invocation parameters: authentication material and runtime-injected context.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Sink for per-invocation telemetry samples supplied by the caller.
pub trait MetricsSink: Send + Sync {
    /// Add one named sample (durations are in milliseconds).
    fn add(&self, name: &str, value: f64);
}

/// IMS authorization forwarded by the runtime.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImsAuth {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl fmt::Debug for ImsAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImsAuth")
            .field("org_id", &self.org_id)
            .field("client_id", &self.client_id)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Parameters of one invocation.
///
/// Vendor credential fields override process-wide configuration when set.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct InvocationParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<ImsAuth>,

    #[serde(rename = "AZURE_OCP_KEY", default, skip_serializing_if = "Option::is_none")]
    pub azure_ocp_key: Option<String>,
    #[serde(rename = "AZURE_OCP_ENDPOINT", default, skip_serializing_if = "Option::is_none")]
    pub azure_ocp_endpoint: Option<String>,

    #[serde(rename = "docCloudClientId", default, skip_serializing_if = "Option::is_none")]
    pub doc_cloud_client_id: Option<String>,
    #[serde(rename = "docCloudClientSecret", default, skip_serializing_if = "Option::is_none")]
    pub doc_cloud_client_secret: Option<String>,
    /// Base64 encoded PEM private key
    #[serde(rename = "docCloudPrivateKey", default, skip_serializing_if = "Option::is_none")]
    pub doc_cloud_private_key: Option<String>,
    #[serde(rename = "docCloudOrgId", default, skip_serializing_if = "Option::is_none")]
    pub doc_cloud_org_id: Option<String>,
    #[serde(rename = "docCloudAccountId", default, skip_serializing_if = "Option::is_none")]
    pub doc_cloud_account_id: Option<String>,

    /// Telemetry sink injected by the runtime
    #[serde(skip)]
    pub metrics: Option<Arc<dyn MetricsSink>>,
}

impl InvocationParams {
    /// Attach a metrics sink.
    pub fn with_metrics(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.metrics = Some(sink);
        self
    }

    /// Record a sample if a sink is attached.
    pub fn record_metric(&self, name: &str, value: f64) {
        if let Some(sink) = &self.metrics {
            sink.add(name, value);
        }
    }
}

fn redact(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| "<redacted>")
}

impl fmt::Debug for InvocationParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationParams")
            .field("auth", &self.auth)
            .field("azure_ocp_key", &redact(&self.azure_ocp_key))
            .field("azure_ocp_endpoint", &self.azure_ocp_endpoint)
            .field("doc_cloud_client_id", &self.doc_cloud_client_id)
            .field("doc_cloud_client_secret", &redact(&self.doc_cloud_client_secret))
            .field("doc_cloud_private_key", &redact(&self.doc_cloud_private_key))
            .field("doc_cloud_org_id", &self.doc_cloud_org_id)
            .field("doc_cloud_account_id", &self.doc_cloud_account_id)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}
