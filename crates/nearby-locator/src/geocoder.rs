//! Reverse geocoding abstractions.

use futures::future::BoxFuture;
use nearby_core::Coordinate;

use crate::error::GeocodeError;

/// The single address record a reverse lookup yields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    /// City or town, e.g. `"New York"`.
    pub locality: Option<String>,
    /// The most specific name the geocoder has: a landmark, building, or
    /// street number.
    pub feature_name: Option<String>,
}

impl Address {
    /// Locality if present, else feature name. Blank strings count as absent.
    #[must_use]
    pub fn place_name(&self) -> Option<String> {
        let non_blank = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_owned)
        };
        non_blank(&self.locality).or_else(|| non_blank(&self.feature_name))
    }
}

/// Turns a coordinate into at most one [`Address`].
///
/// `locale` is a language tag; `None` means the service default.
pub trait ReverseGeocoder: Send + Sync {
    fn reverse_geocode<'a>(
        &'a self,
        coordinate: Coordinate,
        locale: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Option<Address>, GeocodeError>>;
}

/// Geocoder that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopGeocoder;

impl ReverseGeocoder for NoopGeocoder {
    fn reverse_geocode<'a>(
        &'a self,
        _coordinate: Coordinate,
        _locale: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Option<Address>, GeocodeError>> {
        Box::pin(async { Ok(None) })
    }
}
