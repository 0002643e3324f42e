use thiserror::Error;

/// Failure to obtain a coordinate from a [`crate::LocationProvider`].
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from location service")]
    UnexpectedStatus { status: u16 },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("location request was cancelled")]
    Cancelled,

    #[error("invalid location service URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Failure of a reverse geocoding lookup.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from geocoder")]
    UnexpectedStatus { status: u16 },

    #[error("geocoder returned {status}: {message}")]
    Api { status: String, message: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid geocoder base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

/// The only error [`crate::Locator::resolve`] reports. Everything else
/// degrades to an absent coordinate or name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocatorError {
    #[error("location permission denied")]
    PermissionDenied,
}
