//! Catalog access abstraction used by the producers.

use async_trait::async_trait;

use crate::api::types::{Category, Combination, Page, Product};
use crate::error::Result;

/// Paginated read access to a store catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch one page of products.
    async fn fetch_products(&self, offset: u64, limit: u32) -> Result<Page<Product>>;

    /// Fetch one page of categories.
    async fn fetch_categories(&self, offset: u64, limit: u32) -> Result<Page<Category>>;

    /// Fetch every combination of a product (unpaginated).
    async fn fetch_combinations(&self, product_id: u64) -> Result<Vec<Combination>>;

    /// Total number of products, read with an empty page.
    async fn products_total(&self) -> Result<u64> {
        Ok(self.fetch_products(0, 0).await?.total)
    }

    /// Total number of categories, read with an empty page.
    async fn categories_total(&self) -> Result<u64> {
        Ok(self.fetch_categories(0, 0).await?.total)
    }
}
