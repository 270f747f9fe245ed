//! Media module for image descriptors and URL resolution.

pub mod item;

pub use item::{
    category_image, combination_image, product_images, ImageDescriptor, ImageKind, NamingOptions,
};
