//! Worker configuration.

use std::time::Duration;

use acw_models::Animal;
use acw_storage::S3Config;
use acw_vendor::{HttpConfig, PollConfig};

pub const DEFAULT_SENSEI_ENDPOINT: &str = "https://sensei.adobe.io/services/v1/predict";
pub const DEFAULT_PDF_SERVICES_ENDPOINT: &str = "https://pdf-services.adobe.io";
pub const DEFAULT_PHOTOSHOP_ENDPOINT: &str = "https://image.adobe.io";

/// Whether the process runs against dummy credentials and the mock file store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TestMode {
    #[default]
    Disabled,
    Enabled,
}

impl TestMode {
    /// Any non-empty value other than `0` or `false` enables test mode.
    pub fn from_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => TestMode::Disabled,
            Some(v) if v == "0" || v.eq_ignore_ascii_case("false") => TestMode::Disabled,
            Some(_) => TestMode::Enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, TestMode::Enabled)
    }
}

/// Document Cloud service-account fallbacks (`DOC_CLOUD_*`).
#[derive(Clone, Default)]
pub struct DocCloudEnv {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Base64 encoded PEM
    pub private_key_base64: Option<String>,
    pub org_id: Option<String>,
    pub account_id: Option<String>,
}

impl std::fmt::Debug for DocCloudEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocCloudEnv")
            .field("client_id", &self.client_id)
            .field("org_id", &self.org_id)
            .field("account_id", &self.account_id)
            .field("has_client_secret", &self.client_secret.is_some())
            .field("has_private_key", &self.private_key_base64.is_some())
            .finish()
    }
}

/// Picture URLs served by the animal worker.
#[derive(Debug, Clone, Default)]
pub struct AnimalUrls {
    pub cat: Option<String>,
    pub dog: Option<String>,
    pub elephant: Option<String>,
    pub bear: Option<String>,
}

impl AnimalUrls {
    pub fn get(&self, animal: Animal) -> Option<&str> {
        let url = match animal {
            Animal::Cat => &self.cat,
            Animal::Dog => &self.dog,
            Animal::Elephant => &self.elephant,
            Animal::Bear => &self.bear,
        };
        url.as_deref().filter(|u| !u.is_empty())
    }
}

/// Worker configuration.
#[derive(Clone)]
pub struct WorkerConfig {
    /// Dummy credentials and mock file store
    pub test_mode: TestMode,
    /// Vendor HTTP client settings
    pub http: HttpConfig,
    /// Sensei endpoint used when `CCAI_ENDPOINT` is not in the instructions
    pub sensei_endpoint: String,
    pub pdf_services_endpoint: String,
    pub photoshop_endpoint: String,
    /// Photoshop job status polling
    pub photoshop_poll: PollConfig,
    /// Lifetime of presigned URLs handed to vendors
    pub presign_ttl: Duration,
    /// Fallback Azure subscription key (`AZURE_OCP_KEY`)
    pub azure_ocp_key: Option<String>,
    /// Fallback Azure endpoint (`AZURE_OCP_ENDPOINT`)
    pub azure_ocp_endpoint: Option<String>,
    pub doc_cloud: DocCloudEnv,
    /// Cloud file store, when `FILES_S3_*` is complete
    pub file_store: Option<S3Config>,
    pub animal_urls: AnimalUrls,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            test_mode: TestMode::Disabled,
            http: HttpConfig::default(),
            sensei_endpoint: DEFAULT_SENSEI_ENDPOINT.to_string(),
            pdf_services_endpoint: DEFAULT_PDF_SERVICES_ENDPOINT.to_string(),
            photoshop_endpoint: DEFAULT_PHOTOSHOP_ENDPOINT.to_string(),
            photoshop_poll: PollConfig::default(),
            presign_ttl: Duration::from_secs(3600),
            azure_ocp_key: None,
            azure_ocp_endpoint: None,
            doc_cloud: DocCloudEnv::default(),
            file_store: None,
            animal_urls: AnimalUrls::default(),
        }
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let http = HttpConfig {
            timeout: Duration::from_secs(
                std::env::var("HTTP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.http.timeout.as_secs()),
            ),
            connect_timeout: Duration::from_secs(
                std::env::var("HTTP_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.http.connect_timeout.as_secs()),
            ),
        };

        let photoshop_poll = PollConfig {
            interval: Duration::from_millis(
                std::env::var("PHOTOSHOP_POLL_INTERVAL_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.photoshop_poll.interval.as_millis() as u64),
            ),
            max_polls: std::env::var("PHOTOSHOP_MAX_POLLS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.photoshop_poll.max_polls),
        };

        Self {
            test_mode: TestMode::from_value(std::env::var("WORKER_TEST_MODE").ok().as_deref()),
            http,
            sensei_endpoint: env_opt("SENSEI_ENDPOINT").unwrap_or(defaults.sensei_endpoint),
            pdf_services_endpoint: env_opt("PDF_SERVICES_ENDPOINT")
                .unwrap_or(defaults.pdf_services_endpoint),
            photoshop_endpoint: env_opt("PHOTOSHOP_ENDPOINT").unwrap_or(defaults.photoshop_endpoint),
            photoshop_poll,
            presign_ttl: Duration::from_secs(
                std::env::var("PRESIGN_TTL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.presign_ttl.as_secs()),
            ),
            azure_ocp_key: env_opt("AZURE_OCP_KEY"),
            azure_ocp_endpoint: env_opt("AZURE_OCP_ENDPOINT"),
            doc_cloud: DocCloudEnv {
                client_id: env_opt("DOC_CLOUD_CLIENT_ID"),
                client_secret: env_opt("DOC_CLOUD_CLIENT_SECRET"),
                private_key_base64: env_opt("DOC_CLOUD_PRIVATE_KEY_BASE64"),
                org_id: env_opt("DOC_CLOUD_ORG_ID"),
                account_id: env_opt("DOC_CLOUD_ACCOUNT_ID"),
            },
            file_store: S3Config::from_env().ok(),
            animal_urls: AnimalUrls {
                cat: env_opt("ANIMAL_URL_CAT"),
                dog: env_opt("ANIMAL_URL_DOG"),
                elephant: env_opt("ANIMAL_URL_ELEPHANT"),
                bear: env_opt("ANIMAL_URL_BEAR"),
            },
        }
    }

    /// Config for test mode with otherwise default settings.
    pub fn test() -> Self {
        Self {
            test_mode: TestMode::Enabled,
            ..Self::default()
        }
    }
}

impl std::fmt::Debug for WorkerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerConfig")
            .field("test_mode", &self.test_mode)
            .field("http", &self.http)
            .field("sensei_endpoint", &self.sensei_endpoint)
            .field("pdf_services_endpoint", &self.pdf_services_endpoint)
            .field("photoshop_endpoint", &self.photoshop_endpoint)
            .field("photoshop_poll", &self.photoshop_poll)
            .field("presign_ttl", &self.presign_ttl)
            .field("has_azure_ocp_key", &self.azure_ocp_key.is_some())
            .field("azure_ocp_endpoint", &self.azure_ocp_endpoint)
            .field("doc_cloud", &self.doc_cloud)
            .field("file_store", &self.file_store)
            .field("animal_urls", &self.animal_urls)
            .finish()
    }
}
