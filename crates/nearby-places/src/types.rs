//! Places Nearby Search response types.
//!
//! Only the fields the recommendation list needs are modelled. Result entries
//! are kept as raw JSON so one malformed entry cannot fail the whole page.

use serde::Deserialize;

/// Envelope returned by `/maps/api/place/nearbysearch/json`.
#[derive(Debug, Deserialize)]
pub struct NearbySearchResponse {
    /// `"OK"`, `"ZERO_RESULTS"`, or an error code such as `"REQUEST_DENIED"`.
    /// Absent in some proxies and test doubles; treated as `"OK"`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    pub results: Vec<serde_json::Value>,
}

/// One entry in the `results` array.
#[derive(Debug, Deserialize)]
pub struct NearbyPlace {
    #[serde(default)]
    pub name: Option<String>,
}

impl NearbySearchResponse {
    /// Whether the envelope status signals success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.status.as_deref(), None | Some("OK" | "ZERO_RESULTS"))
    }

    /// Non-empty place names in response order. Entries without a string
    /// `name` are skipped.
    #[must_use]
    pub fn place_names(&self) -> Vec<String> {
        self.results
            .iter()
            .filter_map(|v| serde_json::from_value::<NearbyPlace>(v.clone()).ok())
            .filter_map(|p| p.name)
            .filter(|name| !name.is_empty())
            .collect()
    }
}
