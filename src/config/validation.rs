//! Configuration validation logic.

use crate::config::loader::Config;
use crate::config::modes::CatalogScope;
use crate::error::{Error, Result};
use regex::Regex;

/// Minimum number of download workers.
pub const MIN_PARALLELISM: usize = 1;

/// Maximum number of download workers.
pub const MAX_PARALLELISM: usize = 20;

/// Minimum catalog page size.
pub const MIN_FETCH_LIMIT: u32 = 1;

/// Maximum catalog page size accepted by the API.
pub const MAX_FETCH_LIMIT: u32 = 100;

/// Validate the configuration, clamping numeric options into their allowed ranges.
pub fn validate_config(config: &mut Config) -> Result<()> {
    validate_store_id(config.store.store_id)?;
    validate_scope(config.scope())?;

    config.store.token = normalize_token(config.store.token.take())?;

    config.options.parallelism = clamp_parallelism(config.options.parallelism);
    config.options.fetch_limit = clamp_fetch_limit(config.options.fetch_limit);

    Ok(())
}

/// Validate the store ID.
pub fn validate_store_id(store_id: u64) -> Result<()> {
    if store_id == 0 {
        return Err(Error::MissingConfig(
            "store_id (pass --store or set ECWID_STORE_ID)".to_string(),
        ));
    }

    Ok(())
}

/// Reject a run that would skip every resource.
pub fn validate_scope(scope: CatalogScope) -> Result<()> {
    if scope == CatalogScope::Nothing {
        return Err(Error::ConfigValidation {
            field: "skip_products/skip_categories".to_string(),
            message: "Skipping categories and products at the same time is not allowed"
                .to_string(),
        });
    }

    Ok(())
}

/// Trim the token, turning a blank one into `None`, and check its characters.
pub fn normalize_token(token: Option<String>) -> Result<Option<String>> {
    let Some(token) = token else {
        return Ok(None);
    };

    let token = token.trim();
    if token.is_empty() {
        return Ok(None);
    }

    let token_pattern = Regex::new(r"^[A-Za-z0-9_-]+$").expect("token pattern is valid");
    if !token_pattern.is_match(token) {
        return Err(Error::ConfigValidation {
            field: "token".to_string(),
            message: "Token may only contain letters, digits, '-' and '_'".to_string(),
        });
    }

    Ok(Some(token.to_string()))
}

/// Clamp the worker count into `MIN_PARALLELISM..=MAX_PARALLELISM`.
pub fn clamp_parallelism(parallelism: usize) -> usize {
    let clamped = parallelism.clamp(MIN_PARALLELISM, MAX_PARALLELISM);
    if clamped != parallelism {
        tracing::warn!("Parallelism {} out of range, using {}", parallelism, clamped);
    }
    clamped
}

/// Clamp the page size into `MIN_FETCH_LIMIT..=MAX_FETCH_LIMIT`.
pub fn clamp_fetch_limit(limit: u32) -> u32 {
    let clamped = limit.clamp(MIN_FETCH_LIMIT, MAX_FETCH_LIMIT);
    if clamped != limit {
        tracing::warn!("Fetch limit {} out of range, using {}", limit, clamped);
    }
    clamped
}
