mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use propertyfinder_lib::{CrawlConfig, Runner};

use crate::output::{FileSink, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "propertyfinder")]
#[command(about = "Crawl propertyfinder search results into one table per site")]
struct Cli {
    /// Search result URLs to crawl; defaults to the built-in sites
    targets: Vec<String>,

    /// YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the result files are written to
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Worker threads for the crawl runtime
    #[arg(long)]
    workers: Option<usize>,
}

impl Cli {
    fn into_config(self) -> Result<(CrawlConfig, OutputFormat)> {
        let mut config = match &self.config {
            Some(path) => CrawlConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => CrawlConfig::default(),
        };
        if !self.targets.is_empty() {
            config.targets = self.targets;
        }
        if self.out_dir.is_some() {
            config.output_dir = self.out_dir;
        }
        if self.workers.is_some() {
            config.worker_threads = self.workers;
        }
        Ok((config, self.format))
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("propertyfinder=info".parse()?),
        )
        .with_target(false)
        .init();

    let (config, format) = Cli::parse().into_config()?;
    let targets = config.search_targets()?;
    let sink = Arc::new(FileSink::new(config.output_dir(), format));

    let summary = Runner::new(&config)?.run(targets, sink);

    for report in &summary.reports {
        tracing::info!(
            "{}: {} rows from {} pages, {} listings skipped, {}",
            report.target.domain(),
            report.rows,
            report.pages,
            report.skipped_listings,
            report.stop
        );
    }

    let failed = summary.failures().count();
    if failed > 0 {
        bail!("{} of {} targets failed", failed, summary.reports.len());
    }
    Ok(())
}
