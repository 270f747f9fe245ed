//! Ecwid REST API v3 HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::source::CatalogSource;
use crate::api::types::*;
use crate::error::{Error, Result};

/// Ecwid REST API base URL.
pub const API_BASE: &str = "https://app.ecwid.com/api/v3";

/// Timeout applied to every request, catalog and image alike.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Longest response excerpt quoted in decode errors.
const ERROR_EXCERPT_CHARS: usize = 500;

/// Build the HTTP client shared by the catalog API and the download workers.
pub fn build_http_client() -> Result<Client> {
    Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))
}

/// Catalog client bound to one store and token.
#[derive(Debug, Clone)]
pub struct EcwidApi {
    client: Client,
    base_url: Url,
    store_id: u64,
    token: String,
}

impl EcwidApi {
    /// Create a client against the public Ecwid API.
    pub fn new(client: Client, store_id: u64, token: String) -> Result<Self> {
        Self::with_base_url(client, API_BASE, store_id, token)
    }

    /// Create a client against a custom API root.
    pub fn with_base_url(
        client: Client,
        base_url: &str,
        store_id: u64,
        token: String,
    ) -> Result<Self> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
            store_id,
            token,
        })
    }

    /// Build `{base}/{store_id}/{segments...}?token=...`.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Api(format!("Cannot use {} as API base", self.base_url)))?
            .pop_if_empty()
            .push(&self.store_id.to_string())
            .extend(segments);
        url.query_pairs_mut().append_pair("token", &self.token);
        Ok(url)
    }

    fn page_endpoint(&self, resource: &str, offset: u64, limit: u32) -> Result<Url> {
        let mut url = self.endpoint(&[resource])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());
        Ok(url)
    }

    /// Make a GET request and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        // The query string carries the token, keep it out of the logs.
        tracing::debug!("GET {}", url.path());

        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if status == StatusCode::FORBIDDEN {
            return Err(Error::InvalidToken);
        }

        if !status.is_success() {
            return Err(Error::Api(format!("Catalog request failed: HTTP {}", status)));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            Error::Api(format!(
                "Failed to parse response: {} - Response: {}",
                e,
                text.chars().take(ERROR_EXCERPT_CHARS).collect::<String>()
            ))
        })
    }
}

#[async_trait]
impl CatalogSource for EcwidApi {
    async fn fetch_products(&self, offset: u64, limit: u32) -> Result<Page<Product>> {
        let url = self.page_endpoint("products", offset, limit)?;
        self.get_json(url).await
    }

    async fn fetch_categories(&self, offset: u64, limit: u32) -> Result<Page<Category>> {
        let url = self.page_endpoint("categories", offset, limit)?;
        self.get_json(url).await
    }

    async fn fetch_combinations(&self, product_id: u64) -> Result<Vec<Combination>> {
        let product_id = product_id.to_string();
        let url = self.endpoint(&["products", product_id.as_str(), "combinations"])?;
        self.get_json(url).await
    }
}
