use chrono::NaiveDate;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::DownloadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletinType {
    /// Boletín Oficial del Estado
    Boe,
    /// Boletín Oficial del Registro Mercantil
    Borme,
}

impl BulletinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BulletinType::Boe => "BOE",
            BulletinType::Borme => "BORME",
        }
    }

    /// Path of the daily summary endpoint, relative to the site root
    pub fn summary_path(&self) -> &'static str {
        match self {
            BulletinType::Boe => "/diario_boe/xml.php",
            BulletinType::Borme => "/diario_borme/xml.php",
        }
    }

    /// Summary identifier for a day, e.g. `BOE-S-20231007`
    pub fn summary_id(&self, date: NaiveDate) -> String {
        format!("{}-S-{}", self.as_str(), date.format("%Y%m%d"))
    }

    /// Name of the summary element grouping the documents of one issuing body
    pub fn emitter_tag(&self) -> &'static str {
        match self {
            BulletinType::Boe => "departamento",
            BulletinType::Borme => "emisor",
        }
    }

    pub fn document_format(&self) -> DocumentFormat {
        match self {
            BulletinType::Boe => DocumentFormat::Xml,
            BulletinType::Borme => DocumentFormat::Pdf,
        }
    }

    /// Top-level directory used by the dated output layout
    pub fn data_dir(&self) -> &'static str {
        match self {
            BulletinType::Boe => "boe",
            BulletinType::Borme => "borme",
        }
    }
}

impl fmt::Display for BulletinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BulletinType {
    type Err = DownloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "boe" => Ok(BulletinType::Boe),
            "borme" => Ok(BulletinType::Borme),
            other => Err(DownloadError::InvalidType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Xml,
    Pdf,
}

impl DocumentFormat {
    /// Summary element holding the document link for this format
    pub fn link_tag(&self) -> &'static str {
        match self {
            DocumentFormat::Xml => "urlXml",
            DocumentFormat::Pdf => "urlPdf",
        }
    }
}

/// A document listed in a day's summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub id: String,
    pub url: String,
    /// `etq` label of the issuing body
    pub emitter: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputLayout {
    /// Every file directly under the output directory
    #[default]
    Flat,
    /// `<type>/YYYY/MM/DD/<emitter>/` under the output directory
    Dated,
}

#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub bulletin: BulletinType,
    pub date: NaiveDate,
    pub output_dir: PathBuf,
    pub layout: OutputLayout,
    pub keep_summary: bool,
}

#[derive(Debug, Default)]
pub struct DownloadReport {
    pub listed: usize,
    pub written: Vec<PathBuf>,
    /// Items listed without a document link
    pub skipped: usize,
    /// Document id and failure reason
    pub failed: Vec<(String, String)>,
}

impl DownloadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.skipped == 0
    }
}

/// Parse a `YYYYMMDD` string into a calendar date
pub fn parse_date(value: &str) -> Result<NaiveDate, DownloadError> {
    let value = value.trim();
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DownloadError::InvalidDate(value.to_string()));
    }
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .map_err(|_| DownloadError::InvalidDate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("20231007").unwrap(),
            NaiveDate::from_ymd_opt(2023, 10, 7).unwrap()
        );
        assert_eq!(
            parse_date("20240229").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_parse_date_rejects_invalid() {
        for bad in ["20231332", "20230229", "2023107", "2023-10-07", "abcdefgh", ""] {
            assert!(
                matches!(parse_date(bad), Err(DownloadError::InvalidDate(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_bulletin_type_from_str() {
        assert_eq!("boe".parse::<BulletinType>().unwrap(), BulletinType::Boe);
        assert_eq!("BORME".parse::<BulletinType>().unwrap(), BulletinType::Borme);
        assert!(matches!(
            "doue".parse::<BulletinType>(),
            Err(DownloadError::InvalidType(_))
        ));
    }

    #[test]
    fn test_tags_outlive_temporaries() {
        let link_tag = BulletinType::Borme.document_format().link_tag();
        let emitter_tag = BulletinType::Borme.emitter_tag();
        assert_eq!(link_tag, "urlPdf");
        assert_eq!(emitter_tag, "emisor");
        assert_eq!(BulletinType::Boe.document_format().link_tag(), "urlXml");
    }

    #[test]
    fn test_summary_id() {
        let date = NaiveDate::from_ymd_opt(2023, 10, 7).unwrap();
        assert_eq!(BulletinType::Boe.summary_id(date), "BOE-S-20231007");
        assert_eq!(BulletinType::Borme.summary_id(date), "BORME-S-20231007");
    }
}
