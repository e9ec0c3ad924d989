//! Plain HTTP download of a remote file.

use reqwest::Client;
use tracing::debug;

use crate::error::ApiResult;
use crate::http::{build_client, ensure_success, HttpConfig};

#[derive(Clone)]
pub struct Downloader {
    http: Client,
}

impl Downloader {
    pub fn new(config: &HttpConfig) -> ApiResult<Self> {
        Ok(Self {
            http: build_client(config)?,
        })
    }

    /// GET `url` and return the body.
    pub async fn fetch(&self, url: &str) -> ApiResult<Vec<u8>> {
        debug!("Downloading {}", url);
        let response = self.http.get(url).send().await?;
        let response = ensure_success(response, &format!("Download of {}", url)).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
