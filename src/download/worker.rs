//! Download workers.
//!
//! A fixed number of workers share the receiving end of the download queue.
//! Each performs one GET and one file write per image; any failure is counted
//! against that image only and the worker moves on.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::fs::{file_exists, validate_file_name};
use crate::media::ImageDescriptor;
use crate::output::Reporter;

/// Receiving end of the download queue, shared by all workers.
pub type SharedQueue = Arc<Mutex<mpsc::Receiver<ImageDescriptor>>>;

/// Shared state handed to every worker.
#[derive(Clone)]
pub struct WorkerContext {
    pub client: Client,
    pub queue: SharedQueue,
    pub reporter: Arc<Reporter>,
    pub cancel: CancellationToken,
    pub download_dir: PathBuf,
    pub skip_downloaded: bool,
    pub verbose: bool,
}

/// What happened to a single image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Written to disk, with the number of bytes.
    Downloaded(u64),
    /// Already on disk; no request was made.
    Skipped,
}

/// Start `count` workers on the shared queue.
pub fn spawn_workers(count: usize, ctx: WorkerContext) -> JoinSet<()> {
    let mut workers = JoinSet::new();
    for worker_id in 1..=count {
        let ctx = ctx.clone();
        workers.spawn(async move { run_worker(worker_id, ctx).await });
    }
    workers
}

/// Take the next image, or `None` once the queue is closed and drained or
/// cancellation was requested.
async fn next_image(ctx: &WorkerContext) -> Option<ImageDescriptor> {
    if ctx.cancel.is_cancelled() {
        return None;
    }

    let mut queue = ctx.queue.lock().await;
    tokio::select! {
        biased;
        _ = ctx.cancel.cancelled() => None,
        image = queue.recv() => image,
    }
}

async fn run_worker(worker_id: usize, ctx: WorkerContext) {
    tracing::debug!("Worker {} started", worker_id);

    while let Some(image) = next_image(&ctx).await {
        match download_image(&ctx.client, &ctx.download_dir, ctx.skip_downloaded, &image).await {
            Ok(outcome) => {
                ctx.reporter.mark_image_downloaded(true);
                if ctx.verbose {
                    match outcome {
                        DownloadOutcome::Downloaded(bytes) => tracing::info!(
                            "Downloaded image url: {} to file: {} ({} bytes)",
                            image.url,
                            image.file_name,
                            bytes
                        ),
                        DownloadOutcome::Skipped => {
                            tracing::info!("Skipping existing file: {}", image.file_name)
                        }
                    }
                }
            }
            Err(e) => {
                ctx.reporter.mark_image_downloaded(false);
                tracing::warn!(
                    "Error occurred while downloading image from {} to file {}: {}",
                    image.url,
                    image.file_name,
                    e
                );
            }
        }
    }

    tracing::debug!("Worker {} finished", worker_id);
}

/// Download one image below `base_dir`.
pub async fn download_image(
    client: &Client,
    base_dir: &Path,
    skip_downloaded: bool,
    image: &ImageDescriptor,
) -> Result<DownloadOutcome> {
    validate_file_name(&image.file_name)?;

    let output_path = image.target_path(base_dir);

    if skip_downloaded && file_exists(&output_path).await {
        return Ok(DownloadOutcome::Skipped);
    }

    let response = client.get(&image.url).send().await?;
    if !response.status().is_success() {
        return Err(Error::Download(format!("HTTP {}", response.status())));
    }

    tokio::fs::create_dir_all(image.target_dir(base_dir)).await?;

    match write_body(response, &output_path).await {
        Ok(bytes) => Ok(DownloadOutcome::Downloaded(bytes)),
        Err(e) => {
            // A truncated file would be taken as complete by a skip-existing rerun.
            if let Err(remove_err) = tokio::fs::remove_file(&output_path).await {
                tracing::debug!(
                    "Could not remove partial file {}: {}",
                    output_path.display(),
                    remove_err
                );
            }
            Err(e)
        }
    }
}

/// Stream a response body to a file.
async fn write_body(response: reqwest::Response, output_path: &Path) -> Result<u64> {
    let mut file = File::create(output_path).await?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}
