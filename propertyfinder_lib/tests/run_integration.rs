mod common;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use common::*;
use propertyfinder_lib::{
    run_targets, CrawlConfig, ExportRow, OutputError, ResultSink, Runner, SearchTarget, StopReason,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Keeps written rows in memory, keyed by target URL.
#[derive(Default)]
struct MemorySink {
    written: Mutex<HashMap<String, Vec<ExportRow>>>,
}

impl ResultSink for MemorySink {
    fn write(&self, target: &SearchTarget, rows: &[ExportRow]) -> Result<PathBuf, OutputError> {
        self.written
            .lock()
            .unwrap()
            .insert(target.url().to_string(), rows.to_vec());
        Ok(PathBuf::from(target.artifact_name("mem")))
    }
}

/// Panics for one target, to check that the others still finish.
struct PanickySink {
    inner: MemorySink,
    poison: String,
}

impl ResultSink for PanickySink {
    fn write(&self, target: &SearchTarget, rows: &[ExportRow]) -> Result<PathBuf, OutputError> {
        if target.url() == self.poison {
            panic!("sink exploded");
        }
        self.inner.write(target, rows)
    }
}

async fn mount_healthy_search(server: &MockServer, search_path: &str, ids: &[&str]) {
    let listings: Vec<(&str, String)> = ids.iter().map(|id| (*id, detail_url(server, id))).collect();
    Mock::given(method("GET"))
        .and(path(search_path))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(next_data_html(&search_doc(1, &listings))),
        )
        .expect(1)
        .mount(server)
        .await;
    for id in ids {
        mount_listing(server, id).await;
    }
}

#[tokio::test]
async fn failing_target_does_not_affect_others() {
    let server = MockServer::start().await;
    mount_healthy_search(&server, "/a/search", &["1", "2"]).await;
    Mock::given(method("GET"))
        .and(path("/b/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let good = SearchTarget::parse(&format!("{}/a/search?c=1", server.uri())).unwrap();
    let bad = SearchTarget::parse(&format!("{}/b/search?c=1", server.uri())).unwrap();
    let sink = Arc::new(MemorySink::default());

    let summary = run_targets(
        Arc::new(fast_client()),
        vec![bad.clone(), good.clone()],
        sink.clone(),
    )
    .await;

    assert_eq!(summary.reports.len(), 2);
    assert_eq!(summary.reports[0].target, bad);
    assert_eq!(summary.reports[0].rows, 0);
    assert!(matches!(
        summary.reports[0].stop,
        StopReason::PageSkipped { page: 1, .. }
    ));
    assert_eq!(summary.reports[1].rows, 2);
    assert!(matches!(summary.reports[1].stop, StopReason::Completed));
    assert_eq!(summary.total_rows(), 2);

    let written = sink.written.lock().unwrap();
    assert!(written[bad.url()].is_empty());
    assert_eq!(written[good.url()].len(), 2);
}

#[tokio::test]
async fn panicking_target_is_reported_and_isolated() {
    let server = MockServer::start().await;
    mount_healthy_search(&server, "/a/search", &["1"]).await;
    mount_healthy_search(&server, "/b/search", &["2"]).await;

    let good = SearchTarget::parse(&format!("{}/a/search?c=1", server.uri())).unwrap();
    let doomed = SearchTarget::parse(&format!("{}/b/search?c=1", server.uri())).unwrap();
    let sink = Arc::new(PanickySink {
        inner: MemorySink::default(),
        poison: doomed.url().to_string(),
    });

    let summary = run_targets(
        Arc::new(fast_client()),
        vec![good.clone(), doomed.clone()],
        sink.clone(),
    )
    .await;

    assert!(summary.reports[0].is_ok());
    assert!(summary.reports[1].stop.is_fatal());
    assert!(summary.reports[1].artifact.is_err());
    assert_eq!(summary.failures().count(), 1);
    assert_eq!(sink.inner.written.lock().unwrap()[good.url()].len(), 1);
}

/// Records the thread each write happens on.
#[derive(Default)]
struct ThreadSink {
    threads: Mutex<Vec<std::thread::ThreadId>>,
}

impl ResultSink for ThreadSink {
    fn write(&self, target: &SearchTarget, _rows: &[ExportRow]) -> Result<PathBuf, OutputError> {
        self.threads.lock().unwrap().push(std::thread::current().id());
        Ok(PathBuf::from(target.artifact_name("mem")))
    }
}

#[tokio::test]
async fn sink_writes_run_off_the_async_workers() {
    let server = MockServer::start().await;
    mount_healthy_search(&server, "/a/search", &["1"]).await;
    let target = SearchTarget::parse(&format!("{}/a/search?c=1", server.uri())).unwrap();
    let sink = Arc::new(ThreadSink::default());

    let summary = run_targets(Arc::new(fast_client()), vec![target], sink.clone()).await;

    assert!(summary.reports[0].is_ok());
    let threads = sink.threads.lock().unwrap();
    assert_eq!(threads.len(), 1);
    // The current-thread test runtime drives every task on this thread.
    assert_ne!(threads[0], std::thread::current().id());
}

#[test]
fn runner_owns_its_runtime() {
    // The mock server lives on its own runtime; the runner builds another.
    let server_rt = tokio::runtime::Runtime::new().unwrap();
    let server = server_rt.block_on(async {
        let server = MockServer::start().await;
        mount_healthy_search(&server, "/en/search", &["7"]).await;
        server
    });

    let config = CrawlConfig {
        targets: vec![format!("{}/en/search?c=1", server.uri())],
        worker_threads: Some(2),
        max_attempts: Some(2),
        backoff_unit_ms: Some(1),
        ..Default::default()
    };
    let targets = config.search_targets().unwrap();
    let sink = Arc::new(MemorySink::default());

    let summary = Runner::new(&config).unwrap().run(targets, sink.clone());

    assert_eq!(summary.reports.len(), 1);
    assert_eq!(summary.reports[0].rows, 1);
    assert_eq!(
        summary.reports[0].artifact.as_ref().unwrap(),
        &PathBuf::from("1_database.mem")
    );
    assert_eq!(sink.written.lock().unwrap().len(), 1);
    drop(server);
}
