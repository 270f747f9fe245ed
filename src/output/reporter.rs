//! Progress reporting for the download pipeline.
//!
//! Producers and workers update a shared [`Reporter`] through increment-only
//! operations. A background ticker renders a status line at a fixed interval
//! until [`ReporterHandle::done`] stops it and prints the final summary.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Weight of category progress in the overall percentage.
const CATEGORIES_WEIGHT: f64 = 0.15;

/// Weight of product progress in the overall percentage.
const PRODUCTS_WEIGHT: f64 = 0.15;

/// Weight of image progress in the overall percentage.
const IMAGES_WEIGHT: f64 = 0.7;

/// Destination for rendered status lines.
pub type StatusSink = Arc<dyn Fn(&str) + Send + Sync>;

fn stdout_sink() -> StatusSink {
    Arc::new(|line: &str| println!("{}", line))
}

/// Process-wide progress counters.
///
/// Every counter only grows. Reads are individually atomic but not a joint
/// snapshot across counters.
pub struct Reporter {
    products_total: u64,
    categories_total: u64,

    images_added: AtomicU64,
    products_processed: AtomicU64,
    categories_processed: AtomicU64,
    images_succeeded: AtomicU64,
    images_failed: AtomicU64,

    all_products_scheduled: AtomicBool,
    all_categories_scheduled: AtomicBool,
    products_failed: AtomicBool,
    categories_failed: AtomicBool,

    sink: StatusSink,
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

impl Reporter {
    /// Create a reporter printing to stdout.
    pub fn new(products_total: u64, categories_total: u64) -> Self {
        Self::with_sink(products_total, categories_total, stdout_sink())
    }

    /// Create a reporter writing status lines to `sink`.
    pub fn with_sink(products_total: u64, categories_total: u64, sink: StatusSink) -> Self {
        Self {
            products_total,
            categories_total,
            images_added: AtomicU64::new(0),
            products_processed: AtomicU64::new(0),
            categories_processed: AtomicU64::new(0),
            images_succeeded: AtomicU64::new(0),
            images_failed: AtomicU64::new(0),
            all_products_scheduled: AtomicBool::new(false),
            all_categories_scheduled: AtomicBool::new(false),
            products_failed: AtomicBool::new(false),
            categories_failed: AtomicBool::new(false),
            sink,
        }
    }

    pub fn mark_image_added(&self) {
        self.images_added.fetch_add(1, Ordering::Relaxed);
    }

    pub fn mark_product_processed(&self) {
        self.products_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn mark_category_processed(&self) {
        self.categories_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn mark_all_products_scheduled(&self) {
        self.all_products_scheduled.store(true, Ordering::Release);
    }

    pub fn mark_all_categories_scheduled(&self) {
        self.all_categories_scheduled.store(true, Ordering::Release);
    }

    /// Record that the product walk aborted before scheduling everything.
    pub fn mark_products_failed(&self) {
        self.products_failed.store(true, Ordering::Release);
    }

    /// Record that the category walk aborted before scheduling everything.
    pub fn mark_categories_failed(&self) {
        self.categories_failed.store(true, Ordering::Release);
    }

    pub fn mark_image_downloaded(&self, success: bool) {
        if success {
            self.images_succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.images_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Read every counter.
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            products_total: self.products_total,
            categories_total: self.categories_total,
            images_added: self.images_added.load(Ordering::Relaxed),
            products_processed: self.products_processed.load(Ordering::Relaxed),
            categories_processed: self.categories_processed.load(Ordering::Relaxed),
            images_succeeded: self.images_succeeded.load(Ordering::Relaxed),
            images_failed: self.images_failed.load(Ordering::Relaxed),
            all_products_scheduled: self.all_products_scheduled.load(Ordering::Acquire),
            all_categories_scheduled: self.all_categories_scheduled.load(Ordering::Acquire),
            producer_failed: self.products_failed.load(Ordering::Acquire)
                || self.categories_failed.load(Ordering::Acquire),
        }
    }

    /// Render the current status line.
    pub fn status_line(&self) -> String {
        self.snapshot().status_line()
    }

    fn print_status(&self) {
        (self.sink)(&self.status_line());
    }

    /// Print a status line now and then every `period` until the returned
    /// handle is finished with [`ReporterHandle::done`].
    pub fn start(self: &Arc<Self>, period: Duration) -> ReporterHandle {
        self.print_status();

        let period = period.max(Duration::from_millis(1));
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let reporter = Arc::clone(self);

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = &mut stop_rx => return,
                    _ = ticker.tick() => reporter.print_status(),
                }
            }
        });

        ReporterHandle {
            reporter: Arc::clone(self),
            stop: stop_tx,
            task,
        }
    }
}

/// A running status ticker.
///
/// Dropping the handle without calling [`done`](Self::done) stops the ticker
/// too, but skips the final summary.
#[must_use = "call `done` to stop the ticker and print the final summary"]
pub struct ReporterHandle {
    reporter: Arc<Reporter>,
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ReporterHandle {
    /// Stop the ticker and print the final summary line.
    pub async fn done(self) -> ProgressSnapshot {
        // The ticker may already be gone if the runtime is shutting down.
        let _ = self.stop.send(());
        if let Err(e) = self.task.await {
            tracing::debug!("Status ticker ended abnormally: {}", e);
        }

        let snapshot = self.reporter.snapshot();
        (self.reporter.sink)(&snapshot.summary_line());
        snapshot
    }
}

/// Point-in-time view of the progress counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub products_total: u64,
    pub categories_total: u64,
    pub images_added: u64,
    pub products_processed: u64,
    pub categories_processed: u64,
    pub images_succeeded: u64,
    pub images_failed: u64,
    pub all_products_scheduled: bool,
    pub all_categories_scheduled: bool,
    pub producer_failed: bool,
}

fn ratio(processed: u64, total: u64) -> f64 {
    if total == 0 {
        1.0
    } else {
        processed as f64 / total as f64
    }
}

impl ProgressSnapshot {
    /// Images finished either way.
    pub fn images_processed(&self) -> u64 {
        self.images_succeeded + self.images_failed
    }

    /// Whether the image total has stopped growing.
    pub fn all_images_scheduled(&self) -> bool {
        self.all_products_scheduled && self.all_categories_scheduled
    }

    pub fn categories_ratio(&self) -> f64 {
        ratio(self.categories_processed, self.categories_total)
    }

    pub fn products_ratio(&self) -> f64 {
        ratio(self.products_processed, self.products_total)
    }

    /// Image progress, unknown while producers are still scheduling.
    ///
    /// Zero scheduled images count as no progress.
    pub fn images_ratio(&self) -> Option<f64> {
        if !self.all_images_scheduled() {
            return None;
        }

        if self.images_added == 0 {
            Some(0.0)
        } else {
            Some(self.images_processed() as f64 / self.images_added as f64)
        }
    }

    /// Weighted overall completion in `0.0..=1.0`.
    pub fn total_ratio(&self) -> f64 {
        self.categories_ratio() * CATEGORIES_WEIGHT
            + self.products_ratio() * PRODUCTS_WEIGHT
            + self.images_ratio().unwrap_or(0.0) * IMAGES_WEIGHT
    }

    fn images_percent_label(&self) -> String {
        match self.images_ratio() {
            Some(ratio) => format!("{:.0}%", ratio * 100.0),
            None if self.producer_failed => "failed".to_string(),
            None => "??%".to_string(),
        }
    }

    /// Periodic status line.
    pub fn status_line(&self) -> String {
        format!(
            "[{:3.0}%]: Images {} of {} ({}). Categories {} of {} ({:.0}%). Products {} of {} ({:.0}%)",
            self.total_ratio() * 100.0,
            self.images_processed(),
            self.images_added,
            self.images_percent_label(),
            self.categories_processed,
            self.categories_total,
            self.categories_ratio() * 100.0,
            self.products_processed,
            self.products_total,
            self.products_ratio() * 100.0,
        )
    }

    /// Final summary line.
    pub fn summary_line(&self) -> String {
        format!(
            "[100%]: Successfully downloaded: {} images, failed: {} images",
            self.images_succeeded, self.images_failed
        )
    }
}
