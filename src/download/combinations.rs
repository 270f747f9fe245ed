//! Combination sub-producers.
//!
//! Combination images are best-effort: a failed combination fetch is logged
//! and skipped, the parent product walk carries on.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::download::producer::ProducerContext;
use crate::error::{Error, Result};
use crate::media::combination_image;

/// Most combination fetches in flight at once for one page.
pub const MAX_COMBINATION_FETCHES: usize = 8;

/// Fetch the combinations of one product and schedule their images.
///
/// Only cancellation is reported as an error.
pub async fn produce_combinations(
    ctx: &ProducerContext,
    product_id: u64,
    product_name: &str,
) -> Result<()> {
    ctx.check_cancelled()?;

    let combinations = match ctx.source.fetch_combinations(product_id).await {
        Ok(combinations) => combinations,
        Err(e) => {
            tracing::debug!("Skipping combinations of product {}: {}", product_id, e);
            return Ok(());
        }
    };

    for combination in &combinations {
        ctx.check_cancelled()?;

        if let Some(image) = combination_image(product_id, product_name, combination, &ctx.naming)
        {
            ctx.schedule(image).await?;
        }
    }

    Ok(())
}

/// Combination sub-producers of one catalog page.
///
/// Concurrency is capped at the page size and [`MAX_COMBINATION_FETCHES`].
/// The page is finished once [`join`](Self::join) returns.
pub struct CombinationGroup {
    ctx: ProducerContext,
    tasks: JoinSet<()>,
    limit: Arc<Semaphore>,
}

impl CombinationGroup {
    pub fn new(ctx: &ProducerContext, page_len: usize) -> Self {
        Self {
            ctx: ctx.clone(),
            tasks: JoinSet::new(),
            limit: Arc::new(Semaphore::new(page_len.clamp(1, MAX_COMBINATION_FETCHES))),
        }
    }

    /// Start the sub-producer of one product. The product is counted as
    /// processed once its combination images are scheduled.
    pub fn spawn(&mut self, product_id: u64, product_name: String) {
        let ctx = self.ctx.clone();
        let limit = Arc::clone(&self.limit);

        self.tasks.spawn(async move {
            let Ok(_permit) = limit.acquire_owned().await else {
                return;
            };

            match produce_combinations(&ctx, product_id, &product_name).await {
                Ok(()) => ctx.reporter.mark_product_processed(),
                Err(Error::Cancelled) => {
                    tracing::debug!("Combinations of product {} cancelled", product_id)
                }
                Err(e) => tracing::debug!("Combinations of product {} failed: {}", product_id, e),
            }
        });
    }

    /// Wait for every sub-producer of the page.
    pub async fn join(mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Combination task failed: {}", e);
            }
        }
    }
}
