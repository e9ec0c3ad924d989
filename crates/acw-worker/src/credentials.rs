//! Credential resolution.
//!
//! Per-request parameters take precedence over process configuration. Every
//! resolver fails with a configuration error before any network call when a
//! required field is still missing after merging.

use acw_models::InvocationParams;
use acw_vendor::{AzureCredentials, ImsCredentials, ServiceAccount};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};

pub const TEST_IMS_ORG_ID: &str = "test-ims-org-id";
pub const TEST_CLIENT_ID: &str = "test-client-id";
pub const TEST_ACCESS_TOKEN: &str = "test-access-token";
pub const TEST_AZURE_KEY: &str = "test-azure-key";
pub const TEST_AZURE_ENDPOINT: &str = "https://westus.api.cognitive.microsoft.com/";

/// Which IMS fields a vendor needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImsRequirement {
    /// `clientId` and `accessToken`
    Token,
    /// `orgId`, `clientId` and `accessToken`
    TokenAndOrg,
}

fn present(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

fn merge(param: &Option<String>, fallback: &Option<String>) -> Option<String> {
    present(param).or_else(|| present(fallback))
}

/// Resolve IMS bearer credentials from `params.auth`.
pub fn ims(
    params: &InvocationParams,
    config: &WorkerConfig,
    requirement: ImsRequirement,
) -> WorkerResult<ImsCredentials> {
    if config.test_mode.is_enabled() {
        return Ok(ImsCredentials {
            org_id: Some(TEST_IMS_ORG_ID.to_string()),
            client_id: TEST_CLIENT_ID.to_string(),
            access_token: TEST_ACCESS_TOKEN.to_string(),
        });
    }

    let auth = params.auth.clone().unwrap_or_default();
    let org_id = present(&auth.org_id);
    let client_id = present(&auth.client_id);
    let access_token = present(&auth.access_token);

    let mut missing = Vec::new();
    if requirement == ImsRequirement::TokenAndOrg && org_id.is_none() {
        missing.push("orgId");
    }
    if client_id.is_none() {
        missing.push("clientId");
    }
    if access_token.is_none() {
        missing.push("accessToken");
    }

    match (client_id, access_token) {
        (Some(client_id), Some(access_token)) if missing.is_empty() => Ok(ImsCredentials {
            org_id,
            client_id,
            access_token,
        }),
        _ => Err(WorkerError::configuration(format!(
            "Request is missing authorization information: {}",
            missing.join(", ")
        ))),
    }
}

/// Resolve the Azure subscription from params, then environment.
pub fn azure(params: &InvocationParams, config: &WorkerConfig) -> WorkerResult<AzureCredentials> {
    if config.test_mode.is_enabled() {
        return Ok(AzureCredentials {
            subscription_key: TEST_AZURE_KEY.to_string(),
            endpoint: TEST_AZURE_ENDPOINT.to_string(),
        });
    }

    let subscription_key = merge(&params.azure_ocp_key, &config.azure_ocp_key)
        .ok_or_else(|| WorkerError::configuration("Please provide the subscription key"))?;
    let endpoint = merge(&params.azure_ocp_endpoint, &config.azure_ocp_endpoint)
        .ok_or_else(|| WorkerError::configuration("Please provide the endpoint"))?;

    Ok(AzureCredentials {
        subscription_key,
        endpoint,
    })
}

/// Resolve the Document Cloud service account from params, then environment.
pub fn service_account(
    params: &InvocationParams,
    config: &WorkerConfig,
) -> WorkerResult<ServiceAccount> {
    let env = &config.doc_cloud;
    if present(&params.doc_cloud_client_id).is_some() && present(&params.doc_cloud_client_secret).is_some() {
        debug!("Using Doc Cloud credentials from params");
    }

    let fields = [
        ("docCloudClientId", merge(&params.doc_cloud_client_id, &env.client_id)),
        ("docCloudClientSecret", merge(&params.doc_cloud_client_secret, &env.client_secret)),
        ("docCloudPrivateKey", merge(&params.doc_cloud_private_key, &env.private_key_base64)),
        ("docCloudOrgId", merge(&params.doc_cloud_org_id, &env.org_id)),
        ("docCloudAccountId", merge(&params.doc_cloud_account_id, &env.account_id)),
    ];

    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(WorkerError::configuration(format!(
            "Missing some or all of the necessary credentials for PDF Services: {}",
            missing.join(", ")
        )));
    }

    let [client_id, client_secret, private_key, org_id, account_id] =
        fields.map(|(_, value)| value.unwrap_or_default());

    let pem = decode_private_key(&private_key)?;
    ServiceAccount::new(client_id, client_secret, &pem, org_id, account_id)
        .map_err(|e| WorkerError::configuration(format!("Failed to get credentials for PDF Services: {}", e)))
}

/// Decode a base64 encoded PEM private key.
fn decode_private_key(encoded: &str) -> WorkerResult<String> {
    let compact: String = encoded.split_whitespace().collect();
    let bytes = STANDARD.decode(compact.as_bytes()).map_err(|e| {
        WorkerError::configuration(format!("Private key is not valid base64: {}", e))
    })?;
    String::from_utf8(bytes)
        .map_err(|_| WorkerError::configuration("Private key is not valid UTF-8 PEM"))
}
