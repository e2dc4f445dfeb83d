use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::BulletinSource;
use crate::config::Config;
use crate::errors::DownloadError;

/// `BulletinSource` backed by the live site
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(config: &Config) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .user_agent(&config.http.user_agent)
            .timeout(config.http_timeout())
            .build()?;
        Ok(Self { client })
    }

    /// GET `url`, returning the body on success or the failing status
    async fn get_bytes(&self, url: &str) -> Result<Result<Vec<u8>, StatusCode>, DownloadError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Ok(Err(status));
        }
        let content = response.bytes().await?;
        Ok(Ok(content.to_vec()))
    }
}

#[async_trait]
impl BulletinSource for HttpSource {
    async fn fetch_summary(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        self.get_bytes(url)
            .await?
            .map_err(|status| DownloadError::SummaryUnavailable {
                url: url.to_string(),
                status: status.as_u16(),
            })
    }

    async fn fetch_document(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        self.get_bytes(url)
            .await?
            .map_err(|status| DownloadError::DocumentUnavailable {
                url: url.to_string(),
                status: status.as_u16(),
            })
    }
}
