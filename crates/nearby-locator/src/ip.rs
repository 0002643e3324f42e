//! Approximate device location from an ip-api compatible service.

use std::time::Duration;

use futures::future::BoxFuture;
use nearby_core::Coordinate;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::LocationError;
use crate::provider::{CancellationHandle, LocationProvider, Priority};

const DEFAULT_BASE_URL: &str = "http://ip-api.com/";

#[derive(Debug, Deserialize)]
struct IpLocationResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

/// Looks up the caller's public IP position via `GET {base}/json`.
///
/// City-level at best, so every [`Priority`] gets the same answer.
pub struct IpLocationProvider {
    client: Client,
    endpoint: Url,
}

impl IpLocationProvider {
    /// # Errors
    ///
    /// Returns [`LocationError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, LocationError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`LocationError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`LocationError::InvalidBaseUrl`] for an unparsable URL.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, LocationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join("json"))
            .map_err(|e| LocationError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self { client, endpoint })
    }

    async fn lookup(&self) -> Result<Option<Coordinate>, LocationError> {
        let response = self.client.get(self.endpoint.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LocationError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: IpLocationResponse =
            serde_json::from_str(&body).map_err(|e| LocationError::Deserialize {
                context: "ip location lookup".to_string(),
                source: e,
            })?;

        if parsed.status != "success" {
            tracing::info!(
                status = %parsed.status,
                message = parsed.message.as_deref().unwrap_or(""),
                "ip location service has no fix"
            );
            return Ok(None);
        }

        Ok(match (parsed.lat, parsed.lon) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        })
    }
}

impl LocationProvider for IpLocationProvider {
    fn current_location<'a>(
        &'a self,
        priority: Priority,
        cancel: &'a CancellationHandle,
    ) -> BoxFuture<'a, Result<Option<Coordinate>, LocationError>> {
        Box::pin(async move {
            tracing::debug!(?priority, endpoint = %self.endpoint, "requesting ip location");
            tokio::select! {
                () = cancel.cancelled() => Err(LocationError::Cancelled),
                result = self.lookup() => result,
            }
        })
    }
}
