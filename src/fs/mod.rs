//! Filesystem module.
//!
//! Provides:
//! - Download directory management
//! - File name validation and name sanitization

pub mod naming;
pub mod paths;

pub use naming::{sanitize_name, validate_file_name};
pub use paths::{ensure_dir, file_exists};
