//! Catalog walking and image downloading.
//!
//! This module provides:
//! - Product and category producers
//! - Combination sub-producers
//! - The download worker pool
//! - The pipeline coordinator tying them together

pub mod combinations;
pub mod pipeline;
pub mod producer;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use combinations::{produce_combinations, CombinationGroup, MAX_COMBINATION_FETCHES};
pub use pipeline::{
    CatalogTotals, Pipeline, PipelineOptions, PipelineState, PipelineSummary, QUEUE_CAPACITY,
};
pub use producer::{page_offsets, produce_categories, produce_products, ProducerContext};
pub use worker::{download_image, spawn_workers, DownloadOutcome, SharedQueue, WorkerContext};
