//! Public storefront token retrieval.

use reqwest::{header, Client};
use url::Url;

use crate::api::types::InitialDataResponse;

/// Storefront API base URL.
pub const STOREFRONT_BASE: &str = "https://app.ecwid.com/storefront/api/v1";

/// App whose public token grants read access to the catalog.
const STOREFRONT_APP: &str = "ecwid-storefront";

/// Retrieve the public storefront token of a store.
///
/// Any failure (network, status, payload shape, missing app) yields `None`.
pub async fn retrieve_public_token(client: &Client, store_id: u64) -> Option<String> {
    retrieve_public_token_from(client, STOREFRONT_BASE, store_id).await
}

/// Same as [`retrieve_public_token`] against a custom storefront root.
pub async fn retrieve_public_token_from(
    client: &Client,
    storefront_base: &str,
    store_id: u64,
) -> Option<String> {
    let mut url = Url::parse(storefront_base).ok()?;
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .push(&store_id.to_string())
        .push("initial-data");

    tracing::debug!("POST {}", url);

    let response = client
        .post(url)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT, "application/json")
        .body("{}")
        .send()
        .await
        .map_err(|e| tracing::debug!("Token request failed: {}", e))
        .ok()?;

    if !response.status().is_success() {
        tracing::debug!("Token request returned HTTP {}", response.status());
        return None;
    }

    let data: InitialDataResponse = response
        .json()
        .await
        .map_err(|e| tracing::debug!("Failed to parse initial data: {}", e))
        .ok()?;

    data.store_profile
        .value
        .apps_settings
        .public_tokens?
        .remove(STOREFRONT_APP)
        .filter(|token| !token.is_empty())
}
