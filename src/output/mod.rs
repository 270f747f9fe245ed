//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - The pipeline progress reporter
//! - Setup spinners
//! - End-of-run statistics

pub mod console;
pub mod progress;
pub mod reporter;
pub mod stats;

pub use console::{
    mask_token, print_banner, print_config_summary, print_error, print_info, print_warning,
};
pub use progress::create_spinner;
pub use reporter::{ProgressSnapshot, Reporter, ReporterHandle, StatusSink};
pub use stats::print_run_stats;
