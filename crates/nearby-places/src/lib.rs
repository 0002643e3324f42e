//! Nearby place recommendations from the Places Nearby Search API.
//!
//! One GET per category; each category succeeds or fails on its own and a
//! failure only removes that category from the combined result.

pub mod client;
pub mod error;
pub mod types;

pub use client::{NearbyQuery, PlacesClient, DEFAULT_RADIUS_METERS};
pub use error::PlacesError;
pub use types::{NearbyPlace, NearbySearchResponse};
