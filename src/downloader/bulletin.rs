//! Fetch-and-write loop for one day's bulletin

use std::fs;
use tracing::{debug, info, warn};

use super::BulletinSource;
use crate::config::Config;
use crate::errors::DownloadError;
use crate::models::{DownloadReport, DownloadRequest};
use crate::storage;
use crate::summary::parse_summary;

/// Full URL of the day's summary for `request`
pub fn summary_url(request: &DownloadRequest, config: &Config) -> String {
    format!(
        "{}?id={}",
        config.resolve(request.bulletin.summary_path()),
        request.bulletin.summary_id(request.date)
    )
}

/// Resolve the day's summary, then fetch and write each listed document in
/// order. Only summary failures abort the run; document failures are
/// recorded in the report.
pub async fn download_with_source(
    request: &DownloadRequest,
    config: &Config,
    source: &dyn BulletinSource,
) -> Result<DownloadReport, DownloadError> {
    info!(
        "Requesting {} documents of {}",
        request.bulletin,
        request.date.format("%Y/%m/%d")
    );

    let url = summary_url(request, config);
    info!("Downloading summary - {}", url);
    let raw_summary = source.fetch_summary(&url).await?;
    let summary = parse_summary(&String::from_utf8_lossy(&raw_summary), request.bulletin)?;

    fs::create_dir_all(storage::day_dir(request))?;

    let mut report = DownloadReport {
        listed: summary.documents.len(),
        skipped: summary.skipped,
        ..DownloadReport::default()
    };

    if !summary.published {
        warn!(
            "No {} published on {}",
            request.bulletin,
            request.date.format("%Y/%m/%d")
        );
        return Ok(report);
    }

    if request.keep_summary {
        let path = storage::summary_path(request);
        storage::write_file(&path, &raw_summary)?;
        debug!("Summary stored at {}", path.display());
    }

    info!("Found {} documents", summary.documents.len());

    for (index, document) in summary.documents.iter().enumerate() {
        if index > 0 && !config.download_delay().is_zero() {
            tokio::time::sleep(config.download_delay()).await;
        }

        let url = config.resolve(&document.url);
        let path = storage::document_path(request, document);
        info!(
            "Downloading document {}/{}: {} - {}",
            index + 1,
            summary.documents.len(),
            document.id,
            document.title.as_deref().unwrap_or("untitled")
        );
        debug!("Document {} from {}", document.id, url);

        let written = match source.fetch_document(&url).await {
            Ok(content) => storage::write_file(&path, &content),
            Err(e) => Err(e),
        };

        match written {
            Ok(()) => {
                debug!("Saved {}", path.display());
                report.written.push(path);
            }
            Err(e) => {
                warn!("✗ Failed to download document {}: {}", document.id, e);
                report.failed.push((document.id.clone(), e.to_string()));
            }
        }
    }

    info!(
        "Num files downloaded: {} of {}",
        report.written.len(),
        report.listed
    );
    Ok(report)
}
