//! Download the documents published in a day's BOE or BORME bulletin.

pub mod cli;
pub mod config;
pub mod downloader;
pub mod errors;
pub mod models;
pub mod storage;
pub mod summary;

pub use errors::DownloadError;
