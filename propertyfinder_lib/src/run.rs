//! Run orchestration: every target crawled concurrently on a runtime owned
//! by the run.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use futures::future::join_all;
use propertyfinder_api::Client;
use tokio::runtime::{Builder, Runtime};

use crate::config::CrawlConfig;
use crate::crawl::{crawl_target, StopReason};
use crate::error::{CrawlError, OutputError, RunError};
use crate::record::ExportRow;
use crate::target::SearchTarget;

/// Destination for a finished target's rows.
///
/// `write` may block; it is called from tokio's blocking pool.
pub trait ResultSink: Send + Sync {
    /// Persists `rows` for `target` and returns where they were written.
    fn write(&self, target: &SearchTarget, rows: &[ExportRow]) -> Result<PathBuf, OutputError>;
}

/// Outcome of one target within a run.
#[derive(Debug)]
pub struct TargetReport {
    pub target: SearchTarget,
    pub rows: usize,
    pub pages: u32,
    pub skipped_listings: usize,
    pub stop: StopReason,
    pub artifact: Result<PathBuf, OutputError>,
}

impl TargetReport {
    pub fn is_ok(&self) -> bool {
        !self.stop.is_fatal() && self.artifact.is_ok()
    }
}

#[derive(Debug)]
pub struct RunSummary {
    pub reports: Vec<TargetReport>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn total_rows(&self) -> usize {
        self.reports.iter().map(|r| r.rows).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &TargetReport> {
        self.reports.iter().filter(|r| !r.is_ok())
    }
}

/// Owns the runtime and shared HTTP client for one run.
///
/// The runtime is created here and shut down when [`Runner::run`]
/// returns; nothing outlives the run.
pub struct Runner {
    runtime: Runtime,
    client: Arc<Client>,
}

impl Runner {
    pub fn new(config: &CrawlConfig) -> Result<Self, RunError> {
        let client = Client::with_policy(config.retry_policy(), config.request_timeout())?;
        Self::with_client(client, config.worker_threads)
    }

    pub fn with_client(client: Client, worker_threads: Option<usize>) -> Result<Self, RunError> {
        let mut builder = Builder::new_multi_thread();
        builder.enable_all().thread_name("propertyfinder-worker");
        if let Some(threads) = worker_threads {
            builder.worker_threads(threads);
        }
        Ok(Self {
            runtime: builder.build()?,
            client: Arc::new(client),
        })
    }

    /// Crawls every target to completion and tears the runtime down.
    pub fn run(self, targets: Vec<SearchTarget>, sink: Arc<dyn ResultSink>) -> RunSummary {
        let Self { runtime, client } = self;
        let summary = runtime.block_on(run_targets(client, targets, sink));
        runtime.shutdown_timeout(Duration::from_secs(5));
        summary
    }
}

/// Crawls all targets concurrently, one task each, and writes each
/// target's rows to `sink` as soon as that target is done.
///
/// A target that fails, or whose task panics, is reported without
/// affecting the others.
pub async fn run_targets(
    client: Arc<Client>,
    targets: Vec<SearchTarget>,
    sink: Arc<dyn ResultSink>,
) -> RunSummary {
    let started = Instant::now();
    tracing::info!("Starting at {}", Local::now().format("%H:%M:%S"));

    let handles: Vec<_> = targets
        .iter()
        .cloned()
        .map(|target| {
            let client = Arc::clone(&client);
            let sink = Arc::clone(&sink);
            tokio::spawn(async move { crawl_and_write(&client, target, sink).await })
        })
        .collect();

    let reports = join_all(handles)
        .await
        .into_iter()
        .zip(targets)
        .map(|(joined, target)| match joined {
            Ok(report) => report,
            Err(e) => {
                tracing::error!("Crawl of {} aborted: {}", target, e);
                TargetReport {
                    artifact: Err(OutputError {
                        artifact: target.artifact_name("*"),
                        message: "crawl task did not finish".into(),
                    }),
                    stop: StopReason::Fatal {
                        page: 0,
                        error: CrawlError::Task(e.to_string()),
                    },
                    target,
                    rows: 0,
                    pages: 0,
                    skipped_listings: 0,
                }
            }
        })
        .collect();

    let elapsed = started.elapsed();
    tracing::info!("Completed in {:.4} seconds.", elapsed.as_secs_f64());
    RunSummary { reports, elapsed }
}

/// Crawls one target and hands its rows to `sink`.
///
/// The sink does blocking file I/O, so it runs on the blocking pool. A
/// panic inside it is re-raised here and reported like any other task
/// panic.
async fn crawl_and_write(
    client: &Client,
    target: SearchTarget,
    sink: Arc<dyn ResultSink>,
) -> TargetReport {
    let crawl = crawl_target(client, &target).await;
    let rows = crawl.rows.len();
    let artifact = write_rows(sink, target.clone(), crawl.rows).await;
    match &artifact {
        Ok(path) => tracing::info!(
            "Wrote {} rows for {} to {}",
            rows,
            target.domain(),
            path.display()
        ),
        Err(e) => tracing::error!("{}", e),
    }
    TargetReport {
        rows,
        pages: crawl.pages,
        skipped_listings: crawl.skipped_listings,
        stop: crawl.stop,
        artifact,
        target,
    }
}

async fn write_rows(
    sink: Arc<dyn ResultSink>,
    target: SearchTarget,
    rows: Vec<ExportRow>,
) -> Result<PathBuf, OutputError> {
    let artifact = target.artifact_name("*");
    match tokio::task::spawn_blocking(move || sink.write(&target, &rows)).await {
        Ok(written) => written,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => Err(OutputError {
            artifact,
            message: e.to_string(),
        }),
    }
}
