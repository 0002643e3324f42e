//! Reverse geocoding through the Geocoding API (`/maps/api/geocode/json`).
//!
//! Shares the credential used for places search. The first result is mapped
//! onto [`Address`]: its `locality` component becomes the locality and its
//! first component the feature name.

use std::time::Duration;

use futures::future::BoxFuture;
use nearby_core::Coordinate;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::GeocodeError;
use crate::geocoder::{Address, ReverseGeocoder};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/";
const GEOCODE_PATH: &str = "maps/api/geocode/json";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    long_name: String,
    #[serde(default)]
    types: Vec<String>,
}

impl GeocodeResult {
    fn into_address(self) -> Address {
        let locality = self
            .address_components
            .iter()
            .find(|c| c.types.iter().any(|t| t == "locality"))
            .map(|c| c.long_name.clone());
        let feature_name = self
            .address_components
            .into_iter()
            .next()
            .map(|c| c.long_name);
        Address {
            locality,
            feature_name,
        }
    }
}

pub struct GoogleGeocoder {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl GoogleGeocoder {
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, GeocodeError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a geocoder with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`GeocodeError::InvalidBaseUrl`] for an unparsable URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join(GEOCODE_PATH))
            .map_err(|e| GeocodeError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
        })
    }

    fn build_url(&self, coordinate: Coordinate, locale: Option<&str>) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("latlng", &coordinate.to_string());
            if let Some(language) = locale {
                pairs.append_pair("language", language);
            }
            pairs.append_pair("key", &self.api_key);
        }
        url
    }

    async fn lookup(
        &self,
        coordinate: Coordinate,
        locale: Option<&str>,
    ) -> Result<Option<Address>, GeocodeError> {
        let response = self
            .client
            .get(self.build_url(coordinate, locale))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: GeocodeResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: format!("reverse geocode (latlng={coordinate})"),
                source: e,
            })?;

        match parsed.status.as_str() {
            "OK" => Ok(parsed
                .results
                .into_iter()
                .next()
                .map(GeocodeResult::into_address)),
            "ZERO_RESULTS" => Ok(None),
            _ => Err(GeocodeError::Api {
                status: parsed.status,
                message: parsed
                    .error_message
                    .unwrap_or_else(|| "no error message".to_string()),
            }),
        }
    }
}

impl ReverseGeocoder for GoogleGeocoder {
    fn reverse_geocode<'a>(
        &'a self,
        coordinate: Coordinate,
        locale: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Option<Address>, GeocodeError>> {
        Box::pin(self.lookup(coordinate, locale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_geocoder() -> GoogleGeocoder {
        GoogleGeocoder::with_base_url("test-key", 30, "nearby-test/0.1", "https://maps.googleapis.com")
            .expect("geocoder construction should not fail")
    }

    #[test]
    fn build_url_without_locale() {
        let url = test_geocoder().build_url(Coordinate::new(40.73, -73.997), None);
        assert_eq!(
            url.as_str(),
            "https://maps.googleapis.com/maps/api/geocode/json?latlng=40.73%2C-73.997&key=test-key"
        );
    }

    #[test]
    fn build_url_with_locale() {
        let url = test_geocoder().build_url(Coordinate::new(1.5, 2.5), Some("de"));
        assert!(url.as_str().contains("language=de"), "{url}");
    }

    #[test]
    fn into_address_picks_locality_component() {
        let result: GeocodeResult = serde_json::from_value(serde_json::json!({
            "address_components": [
                { "long_name": "70", "types": ["street_number"] },
                { "long_name": "Washington Square South", "types": ["route"] },
                { "long_name": "New York", "types": ["locality", "political"] }
            ]
        }))
        .unwrap();
        let address = result.into_address();
        assert_eq!(address.locality.as_deref(), Some("New York"));
        assert_eq!(address.feature_name.as_deref(), Some("70"));
    }

    #[test]
    fn into_address_without_components_is_empty() {
        let result: GeocodeResult = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(result.into_address(), Address::default());
    }
}
