//! Resolved credential bundles presented to vendors.

use std::fmt;

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};

const IMS_HOST: &str = "https://ims-na1.adobelogin.com";
const ASSERTION_TTL_SECS: i64 = 300;

/// IMS bearer credentials.
#[derive(Clone)]
pub struct ImsCredentials {
    pub org_id: Option<String>,
    pub client_id: String,
    pub access_token: String,
}

impl fmt::Debug for ImsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImsCredentials")
            .field("org_id", &self.org_id)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

/// Azure Cognitive Services subscription.
#[derive(Clone)]
pub struct AzureCredentials {
    pub subscription_key: String,
    /// Resource endpoint, e.g. `https://westus.api.cognitive.microsoft.com/`
    pub endpoint: String,
}

impl fmt::Debug for AzureCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureCredentials")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    aud: String,
    exp: i64,
    #[serde(rename = "https://ims-na1.adobelogin.com/s/ent_documentcloud_sdk")]
    scope: bool,
}

/// Document Cloud service account.
#[derive(Clone)]
pub struct ServiceAccount {
    pub client_id: String,
    pub client_secret: String,
    pub org_id: String,
    pub account_id: String,
    key: EncodingKey,
}

impl ServiceAccount {
    /// Build a service account from a PEM encoded RSA private key.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        private_key_pem: &str,
        org_id: impl Into<String>,
        account_id: impl Into<String>,
    ) -> ApiResult<Self> {
        let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| ApiError::credentials(format!("private key is not a valid RSA PEM: {}", e)))?;

        Ok(Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            org_id: org_id.into(),
            account_id: account_id.into(),
            key,
        })
    }

    /// Signed RS256 assertion identifying this account.
    pub fn assertion(&self) -> ApiResult<String> {
        let claims = AssertionClaims {
            iss: &self.org_id,
            sub: &self.account_id,
            aud: format!("{}/c/{}", IMS_HOST, self.client_id),
            exp: chrono::Utc::now().timestamp() + ASSERTION_TTL_SECS,
            scope: true,
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|e| ApiError::credentials(format!("failed to sign assertion: {}", e)))
    }
}

impl fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_id", &self.client_id)
            .field("org_id", &self.org_id)
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}
