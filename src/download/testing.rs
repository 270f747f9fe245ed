//! In-memory catalog used by the pipeline tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::api::types::{Category, Combination, Page, Product, ProductImage, ProductMedia};
use crate::api::CatalogSource;
use crate::error::{Error, Result};
use crate::media::ImageDescriptor;

/// Catalog whose image URLs all live under `base_url`.
#[derive(Default)]
pub(crate) struct FakeCatalog {
    base_url: String,
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    combinations: HashMap<u64, Vec<Combination>>,
    failing_combinations: HashSet<u64>,
    fail_products_at: Option<u64>,
    fail_categories_at: Option<u64>,
    product_offsets: Mutex<Vec<u64>>,
    category_offsets: Mutex<Vec<u64>>,
    combination_requests: AtomicUsize,
}

impl FakeCatalog {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    /// Products `1..=count`, each with `images` gallery images.
    pub fn with_products(mut self, count: u64, images: usize) -> Self {
        self.products = (1..=count)
            .map(|id| Product {
                id,
                name: format!("Product {}", id),
                media: ProductMedia {
                    images: (0..images)
                        .map(|i| ProductImage {
                            id: i.to_string(),
                            image_original_url: format!("{}/p{}-{}", self.base_url, id, i),
                            ..Default::default()
                        })
                        .collect(),
                },
            })
            .collect();
        self
    }

    /// Categories `1..=count`, each with an image.
    pub fn with_categories(mut self, count: u64) -> Self {
        self.categories = (1..=count)
            .map(|id| Category {
                id,
                name: format!("Category {}", id),
                original_image_url: format!("{}/cat{}", self.base_url, id),
            })
            .collect();
        self
    }

    /// `count` combinations with images for every current product.
    pub fn with_combinations(mut self, count: u32) -> Self {
        for product in &self.products {
            let combinations = (1..=count)
                .map(|number| Combination {
                    id: product.id * 1000 + number as u64,
                    combination_number: number,
                    small_thumbnail_url: format!("{}/p{}-c{}", self.base_url, product.id, number),
                    ..Default::default()
                })
                .collect();
            self.combinations.insert(product.id, combinations);
        }
        self
    }

    pub fn failing_combinations_for(mut self, product_id: u64) -> Self {
        self.failing_combinations.insert(product_id);
        self
    }

    pub fn failing_products_at(mut self, offset: u64) -> Self {
        self.fail_products_at = Some(offset);
        self
    }

    pub fn failing_categories_at(mut self, offset: u64) -> Self {
        self.fail_categories_at = Some(offset);
        self
    }

    /// Offsets of every non-probe product page requested so far.
    pub fn product_offsets(&self) -> Vec<u64> {
        self.product_offsets.lock().unwrap().clone()
    }

    /// Offsets of every non-probe category page requested so far.
    pub fn category_offsets(&self) -> Vec<u64> {
        self.category_offsets.lock().unwrap().clone()
    }

    pub fn combination_requests(&self) -> usize {
        self.combination_requests.load(Ordering::SeqCst)
    }

    /// Number of images a full walk schedules.
    pub fn image_count(&self) -> usize {
        let gallery: usize = self.products.iter().map(|p| p.media.images.len()).sum();
        let combinations: usize = self
            .combinations
            .iter()
            .filter(|(id, _)| !self.failing_combinations.contains(id))
            .map(|(_, c)| c.len())
            .sum();
        gallery + combinations + self.categories.len()
    }
}

fn page_of<T: Clone>(items: &[T], offset: u64, limit: u32) -> Page<T> {
    let start = (offset as usize).min(items.len());
    let end = (start + limit as usize).min(items.len());
    Page {
        total: items.len() as u64,
        count: (end - start) as u64,
        offset,
        limit: limit as u64,
        items: items[start..end].to_vec(),
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn fetch_products(&self, offset: u64, limit: u32) -> Result<Page<Product>> {
        if limit > 0 {
            self.product_offsets.lock().unwrap().push(offset);
        }
        if limit > 0 && self.fail_products_at == Some(offset) {
            return Err(Error::Api("products page unavailable".into()));
        }
        Ok(page_of(&self.products, offset, limit))
    }

    async fn fetch_categories(&self, offset: u64, limit: u32) -> Result<Page<Category>> {
        if limit > 0 {
            self.category_offsets.lock().unwrap().push(offset);
        }
        if limit > 0 && self.fail_categories_at == Some(offset) {
            return Err(Error::Api("categories page unavailable".into()));
        }
        Ok(page_of(&self.categories, offset, limit))
    }

    async fn fetch_combinations(&self, product_id: u64) -> Result<Vec<Combination>> {
        self.combination_requests.fetch_add(1, Ordering::SeqCst);
        if self.failing_combinations.contains(&product_id) {
            return Err(Error::Api("combinations unavailable".into()));
        }
        Ok(self
            .combinations
            .get(&product_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Take everything currently in the queue.
pub(crate) fn drain(rx: &mut mpsc::Receiver<ImageDescriptor>) -> Vec<ImageDescriptor> {
    let mut images = Vec::new();
    while let Ok(image) = rx.try_recv() {
        images.push(image);
    }
    images
}

/// File names of everything currently in the queue.
pub(crate) fn drain_names(rx: &mut mpsc::Receiver<ImageDescriptor>) -> Vec<String> {
    drain(rx).into_iter().map(|image| image.file_name).collect()
}
