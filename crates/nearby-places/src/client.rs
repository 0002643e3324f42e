//! HTTP client for the Places Nearby Search endpoint.
//!
//! Wraps a single `reqwest::Client` built at construction time. Use
//! [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`] to
//! point at a mock server in tests.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use nearby_core::{Category, CategoryResults, Coordinate};
use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::types::NearbySearchResponse;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/";
const NEARBY_SEARCH_PATH: &str = "maps/api/place/nearbysearch/json";

pub const DEFAULT_RADIUS_METERS: u32 = 2000;

/// Search parameters for one fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearbyQuery {
    pub radius_meters: u32,
    /// Queried in this order. Repeated categories are queried once.
    pub categories: Vec<Category>,
}

impl Default for NearbyQuery {
    fn default() -> Self {
        Self {
            radius_meters: DEFAULT_RADIUS_METERS,
            categories: Category::ALL.to_vec(),
        }
    }
}

impl NearbyQuery {
    #[must_use]
    pub fn with_radius(radius_meters: u32) -> Self {
        Self {
            radius_meters,
            ..Self::default()
        }
    }

    fn distinct_categories(&self) -> Vec<Category> {
        let mut seen = Vec::with_capacity(self.categories.len());
        for category in &self.categories {
            if !seen.contains(category) {
                seen.push(*category);
            }
        }
        seen
    }
}

/// Client for the places search API.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    endpoint: Url,
    max_concurrent_requests: usize,
}

impl PlacesClient {
    /// Creates a client pointed at the production places API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join(NEARBY_SEARCH_PATH))
            .map_err(|e| PlacesError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
            max_concurrent_requests: 1,
        })
    }

    /// Allows up to `n` category requests in flight at once. `1` (the
    /// default) issues them strictly one after another. The returned mapping
    /// is the same either way.
    #[must_use]
    pub fn with_max_concurrent_requests(mut self, n: usize) -> Self {
        self.max_concurrent_requests = n.max(1);
        self
    }

    /// Queries every category in `query` around `coordinate`.
    ///
    /// Never fails. A category whose request fails is logged and left out;
    /// a category with no named results is also left out.
    pub async fn fetch_nearby(&self, coordinate: Coordinate, query: &NearbyQuery) -> CategoryResults {
        let radius = query.radius_meters;

        let outcomes: Vec<(Category, Result<Vec<String>, PlacesError>)> =
            stream::iter(query.distinct_categories())
                .map(|category| async move {
                    let outcome = self.search_category(coordinate, radius, category).await;
                    (category, outcome)
                })
                .buffer_unordered(self.max_concurrent_requests)
                .collect()
                .await;

        let mut results = CategoryResults::new();
        for (category, outcome) in outcomes {
            match outcome {
                Ok(names) if names.is_empty() => {
                    tracing::debug!(category = %category, "no named places returned");
                }
                Ok(names) => {
                    tracing::debug!(category = %category, count = names.len(), "collected places");
                    results.insert(category, names);
                }
                Err(e) => {
                    tracing::warn!(
                        category = %category,
                        error = %e,
                        "places search failed; category omitted"
                    );
                }
            }
        }
        results
    }

    /// Issues one nearby search for `category` and returns its place names,
    /// sorted ascending.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure.
    /// - [`PlacesError::UnexpectedStatus`] on a non-2xx status; the body is
    ///   not read.
    /// - [`PlacesError::Deserialize`] if the body is not the expected JSON.
    /// - [`PlacesError::Api`] if the envelope status reports an error.
    pub async fn search_category(
        &self,
        coordinate: Coordinate,
        radius_meters: u32,
        category: Category,
    ) -> Result<Vec<String>, PlacesError> {
        let url = self.build_url(coordinate, radius_meters, category);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlacesError::UnexpectedStatus {
                status: status.as_u16(),
                category: category.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: NearbySearchResponse =
            serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
                context: format!("nearby search (type={category})"),
                source: e,
            })?;

        if !parsed.is_success() {
            return Err(PlacesError::Api {
                status: parsed.status.clone().unwrap_or_default(),
                message: parsed
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "no error message".to_string()),
            });
        }

        let mut names = parsed.place_names();
        names.sort();
        Ok(names)
    }

    /// Builds the request URL with percent-encoded `location`, `radius`,
    /// `type`, and `key` parameters.
    fn build_url(&self, coordinate: Coordinate, radius_meters: u32, category: Category) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("location", &coordinate.to_string())
            .append_pair("radius", &radius_meters.to_string())
            .append_pair("type", category.as_str())
            .append_pair("key", &self.api_key);
        url
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
