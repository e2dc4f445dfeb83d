//! Daily summary ("sumario") parsing
//!
//! A summary groups the day's items under one element per issuing body
//! (`departamento` for BOE, `emisor` for BORME). Each item carries its
//! identifier as the `id` attribute and links to its content in child
//! elements such as `urlPdf` and `urlXml`.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, warn};

use crate::errors::DownloadError;
use crate::models::{BulletinType, DocumentRef};

/// Documents listed in one day's summary
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// False when the site answered with an `error` document instead of a summary
    pub published: bool,
    pub documents: Vec<DocumentRef>,
    /// Items that had no link for the requested format
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Link,
    Title,
}

#[derive(Debug, Default)]
struct PendingItem {
    id: Option<String>,
    link: Option<String>,
    title: Option<String>,
}

fn tag_is(name: &[u8], tag: &str) -> bool {
    name.eq_ignore_ascii_case(tag.as_bytes())
}

/// Root element check. `Ok(false)` means the site answered with an `error`
/// document: nothing was published that day.
fn check_root(name: &[u8]) -> Result<bool, DownloadError> {
    if tag_is(name, "sumario") {
        Ok(true)
    } else if tag_is(name, "error") {
        Ok(false)
    } else {
        Err(DownloadError::InvalidSummary(format!(
            "unexpected root element <{}>",
            String::from_utf8_lossy(name)
        )))
    }
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>, DownloadError> {
    match element.try_get_attribute(name)? {
        Some(attr) => {
            let value = attr.unescape_value()?;
            let value = value.trim();
            Ok((!value.is_empty()).then(|| value.to_string()))
        }
        None => Ok(None),
    }
}

/// Derive an identifier from a document link, e.g.
/// `/diario_boe/xml.php?id=BOE-A-2023-20906` or
/// `/borme/dias/2023/10/06/pdfs/BORME-A-2023-190-02.pdf`
pub fn id_from_link(link: &str) -> Option<String> {
    let last = link.trim().rsplit('/').next()?;
    let last = last.rsplit('=').next()?;
    let stem = match last.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => last,
    };
    (!stem.is_empty()).then(|| stem.to_string())
}

/// Parse a summary document into the list of documents for `bulletin`
pub fn parse_summary(xml: &str, bulletin: BulletinType) -> Result<Summary, DownloadError> {
    let emitter_tag = bulletin.emitter_tag();
    let link_tag = bulletin.document_format().link_tag();

    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut summary = Summary {
        published: true,
        ..Summary::default()
    };
    let mut seen_root = false;
    let mut depth = 0usize;
    let mut emitter: Option<Option<String>> = None;
    let mut item: Option<PendingItem> = None;
    let mut capture: Option<Field> = None;
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name();
                let name = name.as_ref();
                if !seen_root {
                    seen_root = true;
                    if !check_root(name)? {
                        summary.published = false;
                        return Ok(summary);
                    }
                }
                depth += 1;

                if tag_is(name, emitter_tag) {
                    emitter = Some(attribute(&e, "etq")?);
                } else if emitter.is_some() && tag_is(name, "item") {
                    item = Some(PendingItem {
                        id: attribute(&e, "id")?,
                        ..PendingItem::default()
                    });
                } else if item.is_some() && tag_is(name, link_tag) {
                    capture = Some(Field::Link);
                    text.clear();
                } else if item.is_some() && tag_is(name, "titulo") {
                    capture = Some(Field::Title);
                    text.clear();
                }
            }
            Event::Empty(e) => {
                let name = e.local_name();
                let name = name.as_ref();
                if !seen_root {
                    seen_root = true;
                    if !check_root(name)? {
                        summary.published = false;
                        return Ok(summary);
                    }
                }
                if emitter.is_some() && item.is_none() && tag_is(name, "item") {
                    warn!("Summary item without content skipped");
                    summary.skipped += 1;
                }
            }
            Event::Text(e) => {
                if capture.is_some() {
                    text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if capture.is_some() {
                    text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(e) => {
                let name = e.local_name();
                let name = name.as_ref();
                depth = depth.saturating_sub(1);

                if let (Some(field), Some(pending)) = (capture, item.as_mut()) {
                    let closes = match field {
                        Field::Link => tag_is(name, link_tag),
                        Field::Title => tag_is(name, "titulo"),
                    };
                    if closes {
                        let value = text.trim().to_string();
                        if !value.is_empty() {
                            match field {
                                Field::Link => pending.link = Some(value),
                                Field::Title => pending.title = Some(value),
                            }
                        }
                        capture = None;
                        text.clear();
                    }
                }

                if tag_is(name, "item") {
                    if let Some(pending) = item.take() {
                        let label = emitter.clone().flatten();
                        push_item(&mut summary, pending, label, link_tag);
                    }
                } else if tag_is(name, emitter_tag) {
                    emitter = None;
                }
            }
            Event::Eof => {
                if !seen_root {
                    return Err(DownloadError::InvalidSummary("no root element".to_string()));
                }
                if depth != 0 {
                    return Err(DownloadError::InvalidSummary(format!(
                        "document ends with {} unclosed elements",
                        depth
                    )));
                }
                break;
            }
            _ => {}
        }
    }

    debug!(
        "Parsed {} summary: {} documents, {} skipped",
        bulletin,
        summary.documents.len(),
        summary.skipped
    );
    Ok(summary)
}

fn push_item(summary: &mut Summary, pending: PendingItem, emitter: Option<String>, link_tag: &str) {
    let Some(link) = pending.link else {
        warn!(
            "Summary item {} has no {} link, skipped",
            pending.id.as_deref().unwrap_or("unknown"),
            link_tag
        );
        summary.skipped += 1;
        return;
    };

    let Some(id) = pending.id.or_else(|| id_from_link(&link)) else {
        warn!("Summary item with link {} has no identifier, skipped", link);
        summary.skipped += 1;
        return;
    };

    if id.contains(['/', '\\']) || id == "." || id == ".." {
        warn!("Summary item with unusable identifier {:?} skipped", id);
        summary.skipped += 1;
        return;
    }

    summary.documents.push(DocumentRef {
        id,
        url: link,
        emitter,
        title: pending.title,
    });
}
