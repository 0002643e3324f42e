//! Device location and place-name resolution.
//!
//! [`Locator`] combines a [`LocationProvider`] and a [`ReverseGeocoder`]
//! behind a permission check. Providers and geocoders are trait objects so
//! the host (CLI, tests) decides where coordinates and names come from.

pub mod error;
pub mod geocoder;
pub mod google;
pub mod ip;
pub mod locator;
pub mod permission;
pub mod provider;

pub use error::{GeocodeError, LocationError, LocatorError};
pub use geocoder::{Address, NoopGeocoder, ReverseGeocoder};
pub use google::GoogleGeocoder;
pub use ip::IpLocationProvider;
pub use locator::{Locator, Resolved};
pub use permission::{ensure_permission, PermissionGate, StaticPermission};
pub use provider::{CancellationHandle, FixedLocationProvider, LocationProvider, Priority};
