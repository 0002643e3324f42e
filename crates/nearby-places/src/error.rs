use thiserror::Error;

/// Errors from a single places search request.
///
/// None of these escape [`crate::PlacesClient::fetch_nearby`]; they are
/// returned by [`crate::PlacesClient::search_category`] and logged per
/// category by the aggregate call.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. The body is never read.
    #[error("unexpected HTTP status {status} for category {category}")]
    UnexpectedStatus { status: u16, category: String },

    /// The API answered with an envelope status other than `OK` / `ZERO_RESULTS`.
    #[error("places API returned {status}: {message}")]
    Api { status: String, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid places base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
