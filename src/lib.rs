//! Ecwid Images Downloader - bulk export of Ecwid store catalog images
//!
//! This library walks the product and category catalogs of an Ecwid store and
//! downloads every image it finds with a bounded pool of parallel workers.
//!
//! # Features
//!
//! - Paginated product and category walks
//! - Product variation (combination) images
//! - Bounded download queue with backpressure
//! - Periodic weighted progress reporting
//! - Skip-existing reruns and cooperative cancellation
//! - Public storefront token retrieval
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ecwid_images_downloader::api::{build_http_client, EcwidApi};
//! use ecwid_images_downloader::download::{Pipeline, PipelineOptions};
//! use ecwid_images_downloader::Config;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.store.store_id = 1003;
//!
//!     let client = build_http_client()?;
//!     let api = EcwidApi::new(client.clone(), 1003, "public_token".to_string())?;
//!     let pipeline = Pipeline::new(
//!         Arc::new(api),
//!         client,
//!         PipelineOptions::from_config(&config),
//!         CancellationToken::new(),
//!     );
//!
//!     let totals = pipeline.count_totals().await?;
//!     let summary = pipeline.run(totals).await;
//!     println!("{} images downloaded", summary.progress.images_succeeded);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod media;
pub mod output;

// Re-exports for convenience
pub use api::{CatalogSource, EcwidApi};
pub use config::{CatalogScope, Config};
pub use download::{CatalogTotals, Pipeline, PipelineOptions, PipelineSummary};
pub use error::{Error, Result};
pub use media::{ImageDescriptor, ImageKind};
