//! Image descriptors and image URL resolution.

use std::path::{Path, PathBuf};

use crate::api::types::{Category, Combination, Product, ProductImage};
use crate::fs::naming::sanitize_name;

/// Extension given to every downloaded image.
const IMAGE_EXTENSION: &str = "jpg";

/// Kind of catalog entity an image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Product,
    Combination,
    Category,
}

impl ImageKind {
    /// Get the folder name for this kind when folders are separated.
    pub fn folder_name(&self) -> &'static str {
        match self {
            ImageKind::Product => "products",
            ImageKind::Combination => "combinations",
            ImageKind::Category => "categories",
        }
    }
}

/// How file names and folders are derived from catalog entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NamingOptions {
    /// Append the sanitized entity name to the file name.
    pub with_names: bool,
    /// Place each entity kind in its own folder.
    pub separate_folders: bool,
}

/// A downloadable image: where it goes and where it comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescriptor {
    /// File name, deterministic for a given entity.
    pub file_name: String,

    /// Subdirectory below the download directory, if any.
    pub directory: Option<PathBuf>,

    /// Source URL. Never empty.
    pub url: String,
}

impl ImageDescriptor {
    fn new(kind: ImageKind, stem: String, name: &str, url: &str, naming: &NamingOptions) -> Self {
        let file_name = match naming.with_names.then(|| sanitize_name(name)).flatten() {
            Some(name) => format!("{}-{}.{}", stem, name, IMAGE_EXTENSION),
            None => format!("{}.{}", stem, IMAGE_EXTENSION),
        };

        Self {
            file_name,
            directory: naming
                .separate_folders
                .then(|| PathBuf::from(kind.folder_name())),
            url: url.to_string(),
        }
    }

    /// Directory the file is written to.
    pub fn target_dir(&self, base: &Path) -> PathBuf {
        match &self.directory {
            Some(dir) => base.join(dir),
            None => base.to_path_buf(),
        }
    }

    /// Full output path below `base`.
    pub fn target_path(&self, base: &Path) -> PathBuf {
        self.target_dir(base).join(&self.file_name)
    }
}

/// First non-empty candidate, most detailed first.
pub fn first_non_empty<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    candidates.iter().copied().find(|url| !url.is_empty())
}

/// Best available URL of a product gallery image.
pub fn product_image_url(image: &ProductImage) -> Option<&str> {
    first_non_empty(&[
        image.image_original_url.as_str(),
        image.image_1500px_url.as_str(),
        image.image_800px_url.as_str(),
        image.image_400px_url.as_str(),
        image.image_160px_url.as_str(),
    ])
}

/// Best available URL of a combination image.
pub fn combination_image_url(combination: &Combination) -> Option<&str> {
    first_non_empty(&[
        combination.original_image_url.as_str(),
        combination.image_url.as_str(),
        combination.hd_thumbnail_url.as_str(),
        combination.thumbnail_url.as_str(),
        combination.small_thumbnail_url.as_str(),
    ])
}

/// Every downloadable gallery image of a product, in gallery order.
pub fn product_images(product: &Product, naming: &NamingOptions) -> Vec<ImageDescriptor> {
    product
        .media
        .images
        .iter()
        .filter_map(|image| {
            let url = product_image_url(image)?;
            Some(ImageDescriptor::new(
                ImageKind::Product,
                format!("p{}-{}", product.id, image.id),
                &product.name,
                url,
                naming,
            ))
        })
        .collect()
}

/// The image of a product combination, named after the parent product.
pub fn combination_image(
    product_id: u64,
    product_name: &str,
    combination: &Combination,
    naming: &NamingOptions,
) -> Option<ImageDescriptor> {
    let url = combination_image_url(combination)?;
    Some(ImageDescriptor::new(
        ImageKind::Combination,
        format!("p{}-c{}", product_id, combination.combination_number),
        product_name,
        url,
        naming,
    ))
}

/// The image of a category. Only the original rendition is considered.
pub fn category_image(category: &Category, naming: &NamingOptions) -> Option<ImageDescriptor> {
    let url = first_non_empty(&[category.original_image_url.as_str()])?;
    Some(ImageDescriptor::new(
        ImageKind::Category,
        format!("cat{}", category.id),
        category.name.as_str(),
        url,
        naming,
    ))
}
