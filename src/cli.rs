use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

use crate::config::{Config, HttpConfig, DEFAULT_BASE_URL};
use crate::errors::DownloadError;
use crate::models::{parse_date, BulletinType, DownloadRequest, OutputLayout};

#[derive(Parser, Debug)]
#[command(name = "boedl")]
#[command(about = "Download every document published in a day's BOE or BORME bulletin")]
#[command(version)]
pub struct Cli {
    /// Date of the bulletin (YYYYMMDD)
    #[arg(short, long, value_parser = parse_date)]
    pub date: NaiveDate,

    /// Bulletin type (boe or borme)
    #[arg(short = 't', long = "type")]
    pub bulletin: BulletinType,

    /// Output directory, created if missing
    #[arg(short, long)]
    pub outdir: PathBuf,

    /// Store documents under <type>/YYYY/MM/DD/<emitter>/ in the output directory
    #[arg(long)]
    pub tree: bool,

    /// Also store the day's summary XML
    #[arg(long)]
    pub keep_summary: bool,

    /// Site root for summaries and documents
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// HTTP request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// User agent sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Delay between document downloads in milliseconds
    #[arg(long, default_value = "0")]
    pub delay_ms: u64,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn request(&self) -> DownloadRequest {
        DownloadRequest {
            bulletin: self.bulletin,
            date: self.date,
            output_dir: self.outdir.clone(),
            layout: if self.tree {
                OutputLayout::Dated
            } else {
                OutputLayout::Flat
            },
            keep_summary: self.keep_summary,
        }
    }

    /// Build and validate the runtime configuration
    pub fn config(&self) -> Result<Config, DownloadError> {
        let defaults = HttpConfig::default();
        let config = Config {
            base_url: self.base_url.clone(),
            http: HttpConfig {
                timeout_seconds: self.timeout,
                user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            },
            download_delay_ms: self.delay_ms,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_required_arguments() {
        let cli = Cli::try_parse_from([
            "boedl", "--outdir", "out", "--type", "BORME", "--date", "20231006",
        ])
        .unwrap();

        let request = cli.request();
        assert_eq!(request.bulletin, BulletinType::Borme);
        assert_eq!(request.date, NaiveDate::from_ymd_opt(2023, 10, 6).unwrap());
        assert_eq!(request.output_dir, PathBuf::from("out"));
        assert_eq!(request.layout, OutputLayout::Flat);
        assert!(!request.keep_summary);

        let config = cli.config().unwrap();
        assert_eq!(config.base_url, "https://boe.es");
        assert_eq!(config.http.timeout_seconds, 30);
        assert_eq!(config.download_delay_ms, 0);
    }

    #[test]
    fn test_short_flags_and_options() {
        let cli = Cli::try_parse_from([
            "boedl",
            "-o",
            "data",
            "-t",
            "boe",
            "-d",
            "20231007",
            "--tree",
            "--keep-summary",
            "--delay-ms",
            "250",
            "--user-agent",
            "test-agent",
        ])
        .unwrap();

        let request = cli.request();
        assert_eq!(request.bulletin, BulletinType::Boe);
        assert_eq!(request.layout, OutputLayout::Dated);
        assert!(request.keep_summary);
        let config = cli.config().unwrap();
        assert_eq!(config.http.user_agent, "test-agent");
        assert_eq!(config.download_delay_ms, 250);
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        for date in ["20231332", "2023-10-07", "today"] {
            let result =
                Cli::try_parse_from(["boedl", "--outdir", "out", "--type", "boe", "--date", date]);
            assert!(result.is_err(), "{date} should be rejected");
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let base = ["boedl", "-o", "out", "-t", "boe", "-d", "20231007"];

        let args = base.iter().copied().chain(["--base-url", "ftp://boe.es"]);
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.config(), Err(DownloadError::Config(_))));

        let args = base.iter().copied().chain(["--timeout", "0"]);
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.config(), Err(DownloadError::Config(_))));
    }

    #[test]
    fn test_invalid_type_is_rejected() {
        let result = Cli::try_parse_from([
            "boedl", "--outdir", "out", "--type", "dogc", "--date", "20231007",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["boedl", "--type", "boe", "--date", "20231007"]).is_err());
        assert!(Cli::try_parse_from(["boedl", "--outdir", "out", "--date", "20231007"]).is_err());
        assert!(Cli::try_parse_from(["boedl", "--outdir", "out", "--type", "boe"]).is_err());
    }
}
