//! Output layout and file writes

use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::DownloadError;
use crate::models::{BulletinType, DocumentRef, DownloadRequest, OutputLayout};

/// Directory that holds everything for the requested day
pub fn day_dir(request: &DownloadRequest) -> PathBuf {
    match request.layout {
        OutputLayout::Flat => request.output_dir.clone(),
        OutputLayout::Dated => dated_dir(&request.output_dir, request.bulletin, request.date),
    }
}

fn dated_dir(root: &Path, bulletin: BulletinType, date: NaiveDate) -> PathBuf {
    root.join(bulletin.data_dir())
        .join(date.format("%Y").to_string())
        .join(date.format("%m").to_string())
        .join(date.format("%d").to_string())
}

/// Final path of a document under the request's layout. The file is named
/// by the document identifier alone.
pub fn document_path(request: &DownloadRequest, document: &DocumentRef) -> PathBuf {
    let mut dir = day_dir(request);
    if request.layout == OutputLayout::Dated {
        // Emitter labels become directory names
        let emitter = document
            .emitter
            .as_deref()
            .filter(|e| !e.contains(['/', '\\']) && *e != "." && *e != "..");
        if let Some(emitter) = emitter {
            dir = dir.join(emitter);
        }
    }
    dir.join(&document.id)
}

pub fn summary_path(request: &DownloadRequest) -> PathBuf {
    day_dir(request).join(format!("{}.xml", request.bulletin.summary_id(request.date)))
}

/// Write `content` to `path`, creating parent directories and replacing any
/// existing file. The content lands in a temporary sibling first and is
/// renamed into place.
pub fn write_file(path: &Path, content: &[u8]) -> Result<(), DownloadError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = part_path(path);
    let written = fs::write(&tmp_path, content).and_then(|()| fs::rename(&tmp_path, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

/// `BOE-A-2023-20906` -> `BOE-A-2023-20906.part`
fn part_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}
