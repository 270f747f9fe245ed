//! Ecwid API module.
//!
//! This module provides:
//! - The `CatalogSource` abstraction walked by the producers
//! - HTTP client for the Ecwid REST API v3
//! - Public storefront token retrieval
//! - API response types

pub mod client;
pub mod source;
pub mod token;
pub mod types;

pub use client::{build_http_client, EcwidApi, API_BASE};
pub use source::CatalogSource;
pub use token::retrieve_public_token;
pub use types::*;
