use async_trait::async_trait;

use crate::config::Config;
use crate::errors::DownloadError;
use crate::models::{DownloadReport, DownloadRequest};

pub mod bulletin;
pub mod http;

pub use bulletin::download_with_source;
pub use http::HttpSource;

/// Where summaries and documents are fetched from
#[async_trait]
pub trait BulletinSource: Send + Sync {
    /// Fetch a day's summary. Any failure here is fatal to the run.
    async fn fetch_summary(&self, url: &str) -> Result<Vec<u8>, DownloadError>;

    /// Fetch one document's raw content
    async fn fetch_document(&self, url: &str) -> Result<Vec<u8>, DownloadError>;
}

/// Download every document of the requested bulletin from the live site.
/// `config` is expected to have passed `Config::validate`.
pub async fn download_documents(
    request: &DownloadRequest,
    config: &Config,
) -> Result<DownloadReport, DownloadError> {
    let source = HttpSource::new(config)?;
    download_with_source(request, config, &source).await
}
