//! Catalog producers.
//!
//! Each producer walks one paginated resource from offset 0 up to the total
//! read before the walk started, and schedules every image it finds onto the
//! shared download queue. A full queue suspends the producer until a worker
//! frees a slot.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::api::CatalogSource;
use crate::download::combinations::CombinationGroup;
use crate::error::{Error, Result};
use crate::media::{category_image, product_images, ImageDescriptor, NamingOptions};
use crate::output::Reporter;

/// Shared state handed to every producer and combination sub-producer.
#[derive(Clone)]
pub struct ProducerContext {
    pub source: Arc<dyn CatalogSource>,
    pub queue: mpsc::Sender<ImageDescriptor>,
    pub reporter: Arc<Reporter>,
    pub cancel: CancellationToken,
    pub naming: NamingOptions,
    pub fetch_limit: u32,
    pub use_combinations: bool,
}

impl ProducerContext {
    /// Fail with `Error::Cancelled` once cancellation was requested.
    pub fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Put one image on the download queue, waiting for room if it is full.
    pub async fn schedule(&self, image: ImageDescriptor) -> Result<()> {
        let permit = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(Error::Cancelled),
            permit = self.queue.reserve() => permit.map_err(|_| {
                tracing::debug!("Download queue closed, dropping {}", image.file_name);
                Error::Cancelled
            })?,
        };

        // Counted before the send so a worker can never finish an image
        // that is not yet part of the total.
        self.reporter.mark_image_added();
        permit.send(image);
        Ok(())
    }
}

/// Offsets of every page for a walk over `total` items.
pub fn page_offsets(total: u64, limit: u32) -> impl Iterator<Item = u64> {
    let step = limit.max(1) as usize;
    (0..total).step_by(step)
}

/// Walk all products and schedule their images.
///
/// Sets the "all products scheduled" latch on success. On a page failure the
/// failure latch is set instead and the error is returned; on cancellation
/// neither latch is touched.
pub async fn produce_products(ctx: ProducerContext, total: u64) -> Result<()> {
    match walk_products(&ctx, total).await {
        Ok(()) => {
            tracing::debug!("All {} products scheduled", total);
            ctx.reporter.mark_all_products_scheduled();
            Ok(())
        }
        Err(Error::Cancelled) => {
            tracing::debug!("Product producer cancelled");
            Err(Error::Cancelled)
        }
        Err(e) => {
            tracing::error!("Product download interrupted: {}", e);
            ctx.reporter.mark_products_failed();
            Err(e)
        }
    }
}

async fn walk_products(ctx: &ProducerContext, total: u64) -> Result<()> {
    for offset in page_offsets(total, ctx.fetch_limit) {
        ctx.check_cancelled()?;

        let page = ctx.source.fetch_products(offset, ctx.fetch_limit).await?;
        tracing::debug!(
            "Products page at offset {}: {} items",
            offset,
            page.items.len()
        );

        let mut combinations = ctx
            .use_combinations
            .then(|| CombinationGroup::new(ctx, page.items.len()));

        for product in page.items {
            ctx.check_cancelled()?;

            for image in product_images(&product, &ctx.naming) {
                ctx.schedule(image).await?;
            }

            match combinations.as_mut() {
                // Marked processed by the group once its combinations are scheduled.
                Some(group) => group.spawn(product.id, product.name),
                None => ctx.reporter.mark_product_processed(),
            }
        }

        if let Some(group) = combinations {
            group.join().await;
        }
    }

    ctx.check_cancelled()
}

/// Walk all categories and schedule their images.
///
/// Latch semantics match [`produce_products`].
pub async fn produce_categories(ctx: ProducerContext, total: u64) -> Result<()> {
    match walk_categories(&ctx, total).await {
        Ok(()) => {
            tracing::debug!("All {} categories scheduled", total);
            ctx.reporter.mark_all_categories_scheduled();
            Ok(())
        }
        Err(Error::Cancelled) => {
            tracing::debug!("Category producer cancelled");
            Err(Error::Cancelled)
        }
        Err(e) => {
            tracing::error!("Category download interrupted: {}", e);
            ctx.reporter.mark_categories_failed();
            Err(e)
        }
    }
}

async fn walk_categories(ctx: &ProducerContext, total: u64) -> Result<()> {
    for offset in page_offsets(total, ctx.fetch_limit) {
        ctx.check_cancelled()?;

        let page = ctx.source.fetch_categories(offset, ctx.fetch_limit).await?;
        tracing::debug!(
            "Categories page at offset {}: {} items",
            offset,
            page.items.len()
        );

        for category in page.items {
            ctx.check_cancelled()?;

            if let Some(image) = category_image(&category, &ctx.naming) {
                ctx.schedule(image).await?;
            }
            ctx.reporter.mark_category_processed();
        }
    }

    ctx.check_cancelled()
}
