//! Error types for bulletin downloads

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Invalid date '{0}': expected a calendar date as YYYYMMDD")]
    InvalidDate(String),

    #[error("Invalid bulletin type '{0}': expected BOE or BORME")]
    InvalidType(String),

    #[error("Summary {url} unavailable (status {status})")]
    SummaryUnavailable { url: String, status: u16 },

    #[error("Document {url} unavailable (status {status})")]
    DocumentUnavailable { url: String, status: u16 },

    #[error("Not a bulletin summary: {0}")]
    InvalidSummary(String),

    #[error("Failed to parse summary: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Failed to parse summary attribute: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
