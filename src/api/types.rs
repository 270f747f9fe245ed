//! API response type definitions.

use serde::Deserialize;

/// One page of a paginated catalog listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    /// Number of items matching the request across all pages.
    #[serde(default)]
    pub total: u64,
    /// Number of items in this page.
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Store product.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub media: ProductMedia,
}

/// Product gallery.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductMedia {
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

/// A gallery image with its resized renditions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductImage {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "imageOriginalUrl", default)]
    pub image_original_url: String,
    #[serde(rename = "image1500pxUrl", default)]
    pub image_1500px_url: String,
    #[serde(rename = "image800pxUrl", default)]
    pub image_800px_url: String,
    #[serde(rename = "image400pxUrl", default)]
    pub image_400px_url: String,
    #[serde(rename = "image160pxUrl", default)]
    pub image_160px_url: String,
}

/// Product variation ("combination").
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combination {
    pub id: u64,
    #[serde(default)]
    pub combination_number: u32,
    #[serde(default)]
    pub original_image_url: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub hd_thumbnail_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub small_thumbnail_url: String,
}

/// Store category.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub original_image_url: String,
}

/// Storefront bootstrap payload carrying the public app tokens.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialDataResponse {
    #[serde(default)]
    pub store_profile: StoreProfile,
}

#[derive(Debug, Default, Deserialize)]
pub struct StoreProfile {
    #[serde(default)]
    pub value: StoreProfileValue,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreProfileValue {
    #[serde(default)]
    pub apps_settings: AppsSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppsSettings {
    #[serde(default)]
    pub public_tokens: Option<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_products_page() {
        let json = r#"{
            "total": 2, "count": 1, "offset": 0, "limit": 1,
            "items": [{
                "id": 7, "name": "Mug", "sku": "ignored",
                "media": {"images": [{
                    "id": "123",
                    "imageOriginalUrl": "",
                    "image1500pxUrl": "https://cdn/1500.jpg",
                    "image160pxUrl": "https://cdn/160.jpg"
                }]}
            }]
        }"#;

        let page: Page<Product> = serde_json::from_str(json).unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 1);
        let image = &page.items[0].media.images[0];
        assert_eq!(image.id, "123");
        assert_eq!(image.image_1500px_url, "https://cdn/1500.jpg");
        assert!(image.image_800px_url.is_empty());
    }

    #[test]
    fn test_decode_count_only_page() {
        let page: Page<Category> = serde_json::from_str(r#"{"total": 14}"#).unwrap();
        assert_eq!(page.total, 14);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_decode_combination() {
        let json = r#"{"id": 1, "combinationNumber": 3, "hdThumbnailUrl": "https://cdn/hd.jpg"}"#;
        let combination: Combination = serde_json::from_str(json).unwrap();
        assert_eq!(combination.combination_number, 3);
        assert_eq!(combination.hd_thumbnail_url, "https://cdn/hd.jpg");
    }
}
