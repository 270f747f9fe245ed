//! Configuration module for the ecwid-images-downloader.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Catalog scope selection
//! - Configuration validation and range clamping

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{Config, OptionsConfig, StoreConfig};
pub use modes::CatalogScope;
pub use validation::validate_config;
