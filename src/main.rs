use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use boedl::cli::Cli;
use boedl::config::Config;
use boedl::downloader;
use boedl::models::DownloadRequest;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_file.as_deref()) {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(2);
    }

    let config = match cli.config() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(2);
        }
    };

    match run(&cli.request(), &config).await {
        Ok(()) => {
            info!("Operation completed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Download failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(request: &DownloadRequest, config: &Config) -> Result<()> {
    let report = downloader::download_documents(request, config)
        .await
        .with_context(|| {
            format!(
                "{} download for {} failed",
                request.bulletin,
                request.date.format("%Y%m%d")
            )
        })?;

    for (id, reason) in &report.failed {
        warn!("Not downloaded: {} ({})", id, reason);
    }
    if report.is_complete() {
        info!("Downloaded {} of {} documents", report.written.len(), report.listed);
    } else {
        warn!(
            "Downloaded {} of {} documents ({} failed, {} without link)",
            report.written.len(),
            report.listed,
            report.failed.len(),
            report.skipped
        );
    }
    Ok(())
}

fn env_filter() -> EnvFilter {
    // Default to INFO for this crate when RUST_LOG is not set
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("boedl=info"))
}

/// Log to stderr, and additionally to `log_file` when given
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            let file_name = path
                .file_name()
                .with_context(|| format!("invalid log file path: {}", path.display()))?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create log directory: {}", dir.display()))?;

            let file_appender = tracing_appender::rolling::never(dir, file_name);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_filter(env_filter()),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(env_filter()),
        )
        .with(file_layer)
        .init();

    Ok(())
}
