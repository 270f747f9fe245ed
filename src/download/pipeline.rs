//! Pipeline coordinator.
//!
//! Starts the download workers before any producer so an enqueue never waits
//! on a consumer that does not exist yet, then the status reporter, then the
//! producers. Once every producer has returned the queue is closed, the
//! workers drain it, and the reporter prints its final summary.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Client;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::api::CatalogSource;
use crate::config::{CatalogScope, Config};
use crate::download::producer::{produce_categories, produce_products, ProducerContext};
use crate::download::worker::{spawn_workers, WorkerContext};
use crate::error::{Error, Result};
use crate::media::NamingOptions;
use crate::output::{print_info, ProgressSnapshot, Reporter, StatusSink};

/// Capacity of the download queue. A full queue suspends the producers.
pub const QUEUE_CAPACITY: usize = 20_000;

/// Lifecycle of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    /// Producers and workers active.
    Running,
    /// Queue closed, workers finishing.
    Draining,
    Done,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Idle => write!(f, "idle"),
            PipelineState::Running => write!(f, "running"),
            PipelineState::Draining => write!(f, "draining"),
            PipelineState::Done => write!(f, "done"),
        }
    }
}

/// Pipeline settings derived from the configuration.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub scope: CatalogScope,
    pub parallelism: usize,
    pub fetch_limit: u32,
    pub use_combinations: bool,
    pub skip_downloaded: bool,
    pub verbose: bool,
    pub naming: NamingOptions,
    pub download_dir: PathBuf,
    pub report_interval: Duration,
    pub queue_capacity: usize,
}

impl PipelineOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            scope: config.scope(),
            parallelism: config.options.parallelism,
            fetch_limit: config.options.fetch_limit,
            use_combinations: config.options.use_combinations,
            skip_downloaded: config.options.skip_downloaded,
            verbose: config.options.verbose,
            naming: NamingOptions {
                with_names: config.options.with_names,
                separate_folders: config.options.separate_folders,
            },
            download_dir: config.download_directory(),
            report_interval: config.report_interval(),
            queue_capacity: QUEUE_CAPACITY,
        }
    }
}

/// Catalog sizes read once before the walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogTotals {
    pub products: u64,
    pub categories: u64,
}

impl CatalogTotals {
    pub fn is_empty(&self) -> bool {
        self.products == 0 && self.categories == 0
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineSummary {
    /// Counters as of the end of the run.
    pub progress: ProgressSnapshot,
    /// One message per producer that aborted on an error.
    pub producer_failures: Vec<String>,
    /// Whether cancellation was requested during the run.
    pub cancelled: bool,
    /// Whether the catalog was empty and nothing was started.
    pub nothing_to_download: bool,
    pub elapsed: Duration,
}

impl PipelineSummary {
    /// Map the summary to the error the process should exit with, if any.
    ///
    /// Failed images only show up in the counters.
    pub fn into_result(self) -> Result<Self> {
        if self.cancelled {
            return Err(Error::Cancelled);
        }
        if !self.producer_failures.is_empty() {
            return Err(Error::ProducersFailed(self.producer_failures.len()));
        }
        Ok(self)
    }
}

/// Fetch-enumerate-download pipeline over one catalog.
pub struct Pipeline {
    source: Arc<dyn CatalogSource>,
    client: Client,
    options: PipelineOptions,
    cancel: CancellationToken,
    status_sink: Option<StatusSink>,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn CatalogSource>,
        client: Client,
        options: PipelineOptions,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            source,
            client,
            options,
            cancel,
            status_sink: None,
        }
    }

    /// Send status lines somewhere other than stdout.
    pub fn with_status_sink(mut self, sink: StatusSink) -> Self {
        self.status_sink = Some(sink);
        self
    }

    /// Read the totals of every resource in scope.
    ///
    /// Any failure here is fatal to the run.
    pub async fn count_totals(&self) -> Result<CatalogTotals> {
        let mut totals = CatalogTotals::default();

        if self.options.scope.includes_products() {
            totals.products = self.source.products_total().await?;
        }
        if self.options.scope.includes_categories() {
            totals.categories = self.source.categories_total().await?;
        }

        Ok(totals)
    }

    fn transition(&self, state: &mut PipelineState, next: PipelineState) {
        tracing::debug!("Pipeline {} -> {}", state, next);
        *state = next;
    }

    /// Run the pipeline over catalogs of the given sizes.
    pub async fn run(&self, totals: CatalogTotals) -> PipelineSummary {
        let started = Instant::now();
        let mut state = PipelineState::Idle;

        if totals.is_empty() {
            print_info(
                "No products and categories found. Nothing to download. Empty store catalog?",
            );
            self.transition(&mut state, PipelineState::Done);
            return PipelineSummary {
                nothing_to_download: true,
                cancelled: self.cancel.is_cancelled(),
                elapsed: started.elapsed(),
                ..Default::default()
            };
        }

        let reporter = Arc::new(match &self.status_sink {
            Some(sink) => Reporter::with_sink(totals.products, totals.categories, Arc::clone(sink)),
            None => Reporter::new(totals.products, totals.categories),
        });
        if !self.options.scope.includes_products() {
            reporter.mark_all_products_scheduled();
        }
        if !self.options.scope.includes_categories() {
            reporter.mark_all_categories_scheduled();
        }

        let (queue_tx, queue_rx) = mpsc::channel(self.options.queue_capacity.max(1));

        let mut workers = spawn_workers(
            self.options.parallelism.max(1),
            WorkerContext {
                client: self.client.clone(),
                queue: Arc::new(Mutex::new(queue_rx)),
                reporter: Arc::clone(&reporter),
                cancel: self.cancel.clone(),
                download_dir: self.options.download_dir.clone(),
                skip_downloaded: self.options.skip_downloaded,
                verbose: self.options.verbose,
            },
        );

        let status = reporter.start(self.options.report_interval);
        self.transition(&mut state, PipelineState::Running);

        let producer_ctx = ProducerContext {
            source: Arc::clone(&self.source),
            queue: queue_tx,
            reporter: Arc::clone(&reporter),
            cancel: self.cancel.clone(),
            naming: self.options.naming,
            fetch_limit: self.options.fetch_limit.max(1),
            use_combinations: self.options.use_combinations,
        };

        let mut producers = JoinSet::new();
        if self.options.scope.includes_products() {
            let ctx = producer_ctx.clone();
            producers.spawn(async move {
                ("products", produce_products(ctx, totals.products).await)
            });
        }
        if self.options.scope.includes_categories() {
            let ctx = producer_ctx.clone();
            producers.spawn(async move {
                ("categories", produce_categories(ctx, totals.categories).await)
            });
        }
        // Producers now hold the only senders.
        drop(producer_ctx);

        let mut producer_failures = Vec::new();
        while let Some(joined) = producers.join_next().await {
            match joined {
                Ok((_, Ok(()))) | Ok((_, Err(Error::Cancelled))) => {}
                Ok((resource, Err(e))) => producer_failures.push(format!("{}: {}", resource, e)),
                Err(e) => producer_failures.push(format!("producer task failed: {}", e)),
            }
        }

        // Every sender is gone with its producer, so the queue is closed.
        self.transition(&mut state, PipelineState::Draining);

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Download worker failed: {}", e);
            }
        }

        let progress = status.done().await;
        self.transition(&mut state, PipelineState::Done);

        PipelineSummary {
            progress,
            producer_failures,
            cancelled: self.cancel.is_cancelled(),
            nothing_to_download: false,
            elapsed: started.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::testing::FakeCatalog;
    use std::sync::Mutex as StdMutex;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn options(download_dir: PathBuf) -> PipelineOptions {
        PipelineOptions {
            scope: CatalogScope::All,
            parallelism: 4,
            fetch_limit: 2,
            use_combinations: true,
            skip_downloaded: true,
            verbose: false,
            naming: NamingOptions::default(),
            download_dir,
            report_interval: Duration::from_secs(3600),
            queue_capacity: 3,
        }
    }

    fn collecting_sink() -> (StatusSink, Arc<StdMutex<Vec<String>>>) {
        let lines = Arc::new(StdMutex::new(Vec::new()));
        let captured = Arc::clone(&lines);
        let sink: StatusSink = Arc::new(move |line: &str| {
            captured.lock().unwrap().push(line.to_string());
        });
        (sink, lines)
    }

    async fn image_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"img".to_vec()))
            .mount(&server)
            .await;
        server
    }

    fn pipeline(
        catalog: FakeCatalog,
        options: PipelineOptions,
    ) -> (Pipeline, Arc<StdMutex<Vec<String>>>) {
        let (sink, lines) = collecting_sink();
        let pipeline = Pipeline::new(
            Arc::new(catalog),
            Client::new(),
            options,
            CancellationToken::new(),
        )
        .with_status_sink(sink);
        (pipeline, lines)
    }

    #[tokio::test]
    async fn test_full_run_downloads_every_image() {
        let server = image_server().await;
        let temp = tempfile::tempdir().unwrap();
        let catalog = FakeCatalog::new(&server.uri())
            .with_products(5, 2)
            .with_combinations(2)
            .with_categories(3);
        let expected = catalog.image_count() as u64;
        let (pipeline, lines) = pipeline(catalog, options(temp.path().to_path_buf()));

        let totals = pipeline.count_totals().await.unwrap();
        assert_eq!(totals, CatalogTotals { products: 5, categories: 3 });

        let summary = pipeline.run(totals).await;

        assert!(summary.producer_failures.is_empty());
        assert!(!summary.cancelled);
        assert_eq!(summary.progress.images_added, expected);
        assert_eq!(summary.progress.images_succeeded, expected);
        assert_eq!(summary.progress.products_processed, 5);
        assert_eq!(summary.progress.categories_processed, 3);
        assert!(temp.path().join("p5-1.jpg").exists());
        assert!(temp.path().join("p3-c2.jpg").exists());
        assert!(temp.path().join("cat3.jpg").exists());

        let lines = lines.lock().unwrap();
        let summaries = lines.iter().filter(|l| l.contains("Successfully downloaded")).count();
        assert_eq!(summaries, 1);
        assert!(summary.into_result().is_ok());
    }

    #[tokio::test]
    async fn test_second_run_with_skip_makes_no_requests() {
        let server = image_server().await;
        let temp = tempfile::tempdir().unwrap();
        let build = || {
            FakeCatalog::new(&server.uri())
                .with_products(3, 2)
                .with_categories(2)
        };

        let (first, _) = pipeline(build(), options(temp.path().to_path_buf()));
        let totals = first.count_totals().await.unwrap();
        first.run(totals).await;
        let after_first = server.received_requests().await.unwrap().len();
        assert_eq!(after_first, 8);

        let (second, _) = pipeline(build(), options(temp.path().to_path_buf()));
        let summary = second.run(totals).await;

        assert_eq!(server.received_requests().await.unwrap().len(), after_first);
        assert_eq!(summary.progress.images_succeeded, 8);
        assert_eq!(summary.progress.images_failed, 0);
    }

    #[tokio::test]
    async fn test_empty_catalog_starts_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let (pipeline, lines) = pipeline(
            FakeCatalog::new("http://unused"),
            options(temp.path().to_path_buf()),
        );

        let totals = pipeline.count_totals().await.unwrap();
        let summary = pipeline.run(totals).await;

        assert!(summary.nothing_to_download);
        assert_eq!(summary.progress, ProgressSnapshot::default());
        // The reporter never started.
        assert!(lines.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_producer_does_not_stop_sibling() {
        let server = image_server().await;
        let temp = tempfile::tempdir().unwrap();
        let catalog = FakeCatalog::new(&server.uri())
            .with_products(6, 1)
            .failing_products_at(2)
            .with_categories(4);
        let mut opts = options(temp.path().to_path_buf());
        opts.use_combinations = false;
        let (pipeline, _) = pipeline(catalog, opts);

        let summary = pipeline.run(CatalogTotals { products: 6, categories: 4 }).await;

        assert_eq!(summary.producer_failures.len(), 1);
        assert!(summary.producer_failures[0].starts_with("products"));
        assert_eq!(summary.progress.categories_processed, 4);
        assert_eq!(summary.progress.images_succeeded, 2 + 4);
        assert!(!summary.progress.all_products_scheduled);
        assert!(summary.progress.all_categories_scheduled);
        assert!(matches!(summary.into_result(), Err(Error::ProducersFailed(1))));
    }

    #[test]
    fn test_failed_images_do_not_fail_the_run() {
        let summary = PipelineSummary {
            progress: ProgressSnapshot {
                images_added: 10,
                images_succeeded: 9,
                images_failed: 1,
                ..Default::default()
            },
            ..Default::default()
        };

        let summary = summary.into_result().unwrap();
        assert_eq!(summary.progress.images_failed, 1);
    }

    #[tokio::test]
    async fn test_run_with_missing_images_still_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cat2"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"img".to_vec()))
            .mount(&server)
            .await;

        let temp = tempfile::tempdir().unwrap();
        let catalog = FakeCatalog::new(&server.uri()).with_categories(3);
        let (pipeline, _) = pipeline(catalog, options(temp.path().to_path_buf()));

        let summary = pipeline.run(CatalogTotals { products: 0, categories: 3 }).await;

        assert_eq!(summary.progress.images_succeeded, 2);
        assert_eq!(summary.progress.images_failed, 1);
        assert!(summary.into_result().is_ok());
    }

    #[tokio::test]
    async fn test_skipped_resource_counts_as_scheduled() {
        let server = image_server().await;
        let temp = tempfile::tempdir().unwrap();
        let catalog = FakeCatalog::new(&server.uri())
            .with_products(2, 1)
            .with_categories(2);
        let mut opts = options(temp.path().to_path_buf());
        opts.scope = CatalogScope::Categories;
        let (pipeline, _) = pipeline(catalog, opts);

        let totals = pipeline.count_totals().await.unwrap();
        assert_eq!(totals.products, 0);
        let summary = pipeline.run(totals).await;

        assert!(summary.progress.all_products_scheduled);
        assert_eq!(summary.progress.images_succeeded, 2);
        assert!(!temp.path().join("p1-0.jpg").exists());
    }

    #[tokio::test]
    async fn test_cancellation_mid_run_finishes_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"slow".to_vec())
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&server)
            .await;

        let temp = tempfile::tempdir().unwrap();
        let catalog = FakeCatalog::new(&server.uri())
            .with_products(50, 4)
            .with_categories(50);
        let mut opts = options(temp.path().to_path_buf());
        opts.parallelism = 2;
        opts.use_combinations = false;
        let (pipeline, lines) = pipeline(catalog, opts);
        let cancel = pipeline.cancel.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            cancel.cancel();
        });

        let summary = tokio::time::timeout(
            Duration::from_secs(10),
            pipeline.run(CatalogTotals { products: 50, categories: 50 }),
        )
        .await
        .expect("pipeline hung after cancellation");

        assert!(summary.cancelled);
        assert!(summary.progress.images_processed() < 250);
        let summaries = lines
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.contains("Successfully downloaded"))
            .count();
        assert_eq!(summaries, 1);
        assert!(matches!(summary.into_result(), Err(Error::Cancelled)));
    }
}
