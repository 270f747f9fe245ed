//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// Ecwid catalog images downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "ecwid-images-downloader",
    version,
    about = "Download product and category images from an Ecwid store",
    long_about = "A CLI tool to download every product, variation and category image of an Ecwid store.\n\n\
                  Images are fetched in parallel and saved under downloads/{store id} by default."
)]
pub struct Args {
    /// Ecwid store ID.
    #[arg(short, long = "store", env = "ECWID_STORE_ID")]
    pub store_id: Option<u64>,

    /// Public or secret API token. Retrieved from the storefront when omitted.
    #[arg(short, long, env = "ECWID_TOKEN")]
    pub token: Option<String>,

    /// Base directory for downloads.
    #[arg(short = 'd', long = "download-dir")]
    pub download_directory: Option<PathBuf>,

    /// Number of parallel downloads (1-20).
    #[arg(short, long)]
    pub parallelism: Option<usize>,

    /// Page size for catalog requests (1-100).
    #[arg(short, long)]
    pub limit: Option<u32>,

    /// Also download product variation images.
    #[arg(long)]
    pub use_combinations: bool,

    /// Skip images already present on disk.
    #[arg(long)]
    pub skip_downloaded: bool,

    /// Do not download product images.
    #[arg(long)]
    pub skip_products: bool,

    /// Do not download category images.
    #[arg(long)]
    pub skip_categories: bool,

    /// Append the product or category name to each file name.
    #[arg(long)]
    pub with_names: bool,

    /// Put product, variation and category images in separate folders.
    #[arg(long)]
    pub separate_folders: bool,

    /// Seconds between status lines.
    #[arg(long = "report-interval")]
    pub report_interval: Option<u64>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "ecwid-images.toml")]
    pub config: PathBuf,

    /// Log every download and enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(self, config: &mut Config) {
        if let Some(store_id) = self.store_id {
            config.store.store_id = store_id;
        }

        if let Some(token) = self.token {
            config.store.token = Some(token);
        }

        if let Some(dir) = self.download_directory {
            config.options.download_directory = Some(dir);
        }

        if let Some(parallelism) = self.parallelism {
            config.options.parallelism = parallelism;
        }

        if let Some(limit) = self.limit {
            config.options.fetch_limit = limit;
        }

        if let Some(interval) = self.report_interval {
            config.options.report_interval_seconds = interval;
        }

        // Boolean flags (only override if set)
        if self.use_combinations {
            config.options.use_combinations = true;
        }

        if self.skip_downloaded {
            config.options.skip_downloaded = true;
        }

        if self.skip_products {
            config.options.skip_products = true;
        }

        if self.skip_categories {
            config.options.skip_categories = true;
        }

        if self.with_names {
            config.options.with_names = true;
        }

        if self.separate_folders {
            config.options.separate_folders = true;
        }

        if self.verbose {
            config.options.verbose = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_file_values() {
        let args = Args::parse_from([
            "ecwid-images-downloader",
            "--store",
            "1003",
            "--token",
            "public_abc",
            "--parallelism",
            "12",
            "--use-combinations",
            "--skip-categories",
        ]);

        let mut config = Config::default();
        config.options.fetch_limit = 50;
        args.merge_into_config(&mut config);

        assert_eq!(config.store.store_id, 1003);
        assert_eq!(config.store.token.as_deref(), Some("public_abc"));
        assert_eq!(config.options.parallelism, 12);
        assert_eq!(config.options.fetch_limit, 50);
        assert!(config.options.use_combinations);
        assert!(config.options.skip_categories);
        assert!(!config.options.skip_products);
    }

    #[test]
    fn test_unset_flags_keep_file_values() {
        let args = Args::parse_from(["ecwid-images-downloader", "--config", "custom.toml"]);
        assert_eq!(args.config, PathBuf::from("custom.toml"));

        let mut config = Config::default();
        config.store.store_id = 77;
        config.options.verbose = true;
        config.options.with_names = true;
        args.merge_into_config(&mut config);

        assert_eq!(config.store.store_id, 77);
        assert!(config.options.verbose);
        assert!(config.options.with_names);
    }
}
