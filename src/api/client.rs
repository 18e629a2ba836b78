use crate::api::query::Query;
use crate::api::traits::{HealthProbe, RentalsApi};
use crate::api::ApiError;
use crate::config::Config;
use crate::models::{CursorPage, HealthReport, Rental, RentalFilters};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

const RENTALS_PATH: &str = "/api/rentals";
const HEALTH_PATH: &str = "/api/healthcheck";

/// HTTP client for the rentals API
#[derive(Debug, Clone)]
pub struct RentalsClient {
    client: Client,
    base_url: Url,
}

impl RentalsClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("rental-finder/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Self::with_client(client, &config.api_base_url)
    }

    /// Use an already configured `reqwest::Client`
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid API base URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("API base URL cannot be a base: {}", base_url);
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for `path` with the query attached (no `?` when empty)
    pub fn endpoint(&self, path: &str, query: &Query) -> Url {
        let mut url = self.base_url.clone();
        let base_path = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{}{}", base_path, path));
        url.set_query(None);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.pairs());
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} returned status: {}", url.path(), status);
            return Err(ApiError::from_status(status));
        }

        let body = response.text().await?;

        debug!("Received {} bytes from {}", body.len(), url.path());

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn health(&self) -> Result<HealthReport, ApiError> {
        self.get_json(self.endpoint(HEALTH_PATH, &Query::default()))
            .await
    }
}

#[async_trait]
impl RentalsApi for RentalsClient {
    async fn fetch_list(
        &self,
        filters: &RentalFilters,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Rental>, ApiError> {
        let mut query = Query::from_filters(filters);
        query.push("limit", Some(limit)).push("offset", Some(offset));

        self.get_json(self.endpoint(RENTALS_PATH, &query)).await
    }

    async fn fetch_page(
        &self,
        filters: &RentalFilters,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<CursorPage, ApiError> {
        let mut query = Query::from_filters(filters);
        query.push("limit", Some(limit)).push_text("cursor", cursor);

        self.get_json(self.endpoint(RENTALS_PATH, &query)).await
    }
}

#[async_trait]
impl HealthProbe for RentalsClient {
    async fn check(&self) -> Result<HealthReport, ApiError> {
        self.health().await
    }
}
