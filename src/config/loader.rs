//! Configuration structures and loading logic.

use crate::config::modes::CatalogScope;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default number of parallel download workers.
pub const DEFAULT_PARALLELISM: usize = 5;

/// Default page size for catalog requests.
pub const DEFAULT_FETCH_LIMIT: u32 = 100;

/// Default interval between status lines, in seconds.
pub const DEFAULT_REPORT_INTERVAL: u64 = 5;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Store identification and credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Numeric Ecwid store ID.
    #[serde(default)]
    pub store_id: u64,

    /// Public or secret access token. Retrieved from the storefront when absent.
    #[serde(default)]
    pub token: Option<String>,
}

/// Download options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Base directory for downloads. Defaults to `downloads/{store_id}`.
    #[serde(default)]
    pub download_directory: Option<PathBuf>,

    /// Number of parallel download workers (1-20).
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,

    /// Page size for catalog requests (1-100).
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: u32,

    /// Whether to download product variation images.
    #[serde(default)]
    pub use_combinations: bool,

    /// Whether to skip images already present on disk.
    #[serde(default)]
    pub skip_downloaded: bool,

    /// Whether to log every downloaded file.
    #[serde(default)]
    pub verbose: bool,

    /// Whether to leave products out of the export.
    #[serde(default)]
    pub skip_products: bool,

    /// Whether to leave categories out of the export.
    #[serde(default)]
    pub skip_categories: bool,

    /// Whether to append the item name to each file name.
    #[serde(default)]
    pub with_names: bool,

    /// Whether to put each image kind in its own subdirectory.
    #[serde(default)]
    pub separate_folders: bool,

    /// Seconds between status lines.
    #[serde(default = "default_report_interval")]
    pub report_interval_seconds: u64,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            download_directory: None,
            parallelism: DEFAULT_PARALLELISM,
            fetch_limit: DEFAULT_FETCH_LIMIT,
            use_combinations: false,
            skip_downloaded: false,
            verbose: false,
            skip_products: false,
            skip_categories: false,
            with_names: false,
            separate_folders: false,
            report_interval_seconds: DEFAULT_REPORT_INTERVAL,
        }
    }
}

fn default_parallelism() -> usize {
    DEFAULT_PARALLELISM
}

fn default_fetch_limit() -> u32 {
    DEFAULT_FETCH_LIMIT
}

fn default_report_interval() -> u64 {
    DEFAULT_REPORT_INTERVAL
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!("Configuration file not found: {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the effective download directory.
    pub fn download_directory(&self) -> PathBuf {
        self.options
            .download_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("downloads").join(self.store.store_id.to_string()))
    }

    /// Which catalog resources this run exports.
    pub fn scope(&self) -> CatalogScope {
        CatalogScope::from_skip_flags(self.options.skip_products, self.options.skip_categories)
    }

    /// Interval between status lines.
    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.options.report_interval_seconds.max(1))
    }
}
