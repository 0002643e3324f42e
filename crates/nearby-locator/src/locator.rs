//! Coordinate and place-name resolution for one fetch cycle.

use std::sync::Arc;

use nearby_core::{Coordinate, PermissionSetting};

use crate::error::LocatorError;
use crate::geocoder::ReverseGeocoder;
use crate::provider::{CancellationHandle, LocationProvider, Priority};

/// What [`Locator::resolve`] found. `place_name` is only ever set when
/// `coordinate` is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolved {
    pub coordinate: Option<Coordinate>,
    pub place_name: Option<String>,
}

impl Resolved {
    #[must_use]
    pub fn unavailable() -> Self {
        Self::default()
    }
}

#[derive(Clone)]
pub struct Locator {
    provider: Arc<dyn LocationProvider>,
    geocoder: Arc<dyn ReverseGeocoder>,
    locale: Option<String>,
}

impl Locator {
    pub fn new(provider: Arc<dyn LocationProvider>, geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self {
            provider,
            geocoder,
            locale: None,
        }
    }

    /// Language tag passed to the geocoder. `None` keeps its default.
    #[must_use]
    pub fn with_locale(mut self, locale: Option<String>) -> Self {
        self.locale = locale;
        self
    }

    /// Resolves the current coordinate and a name for it.
    ///
    /// The provider is not contacted unless `permission` is granted. A
    /// provider failure or empty fix yields [`Resolved::unavailable`] without
    /// geocoding; a geocoder failure only drops the name.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::PermissionDenied`] for any permission other
    /// than [`PermissionSetting::Granted`].
    pub async fn resolve(&self, permission: PermissionSetting) -> Result<Resolved, LocatorError> {
        if permission != PermissionSetting::Granted {
            return Err(LocatorError::PermissionDenied);
        }

        let cancel = CancellationHandle::new();
        let coordinate = match self
            .provider
            .current_location(Priority::HighAccuracy, &cancel)
            .await
        {
            Ok(Some(coordinate)) => coordinate,
            Ok(None) => {
                tracing::info!("location provider has no current fix");
                return Ok(Resolved::unavailable());
            }
            Err(e) => {
                tracing::warn!(error = %e, "location request failed");
                return Ok(Resolved::unavailable());
            }
        };

        let place_name = self.place_name(coordinate).await;
        Ok(Resolved {
            coordinate: Some(coordinate),
            place_name,
        })
    }

    /// Best-effort name for `coordinate`; any geocoder error becomes `None`.
    pub async fn place_name(&self, coordinate: Coordinate) -> Option<String> {
        match self
            .geocoder
            .reverse_geocode(coordinate, self.locale.as_deref())
            .await
        {
            Ok(Some(address)) => address.place_name(),
            Ok(None) => {
                tracing::debug!(%coordinate, "geocoder returned no address");
                None
            }
            Err(e) => {
                tracing::warn!(%coordinate, error = %e, "reverse geocoding failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::future::BoxFuture;

    use super::*;
    use crate::error::{GeocodeError, LocationError};
    use crate::geocoder::Address;
    use crate::provider::FixedLocationProvider;

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    impl LocationProvider for CountingProvider {
        fn current_location<'a>(
            &'a self,
            priority: Priority,
            _cancel: &'a CancellationHandle,
        ) -> BoxFuture<'a, Result<Option<Coordinate>, LocationError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(priority, Priority::HighAccuracy);
            let fail = self.fail;
            Box::pin(async move {
                if fail {
                    Err(LocationError::UnexpectedStatus { status: 500 })
                } else {
                    Ok(Some(Coordinate::new(40.73, -73.997)))
                }
            })
        }
    }

    #[derive(Default)]
    struct ScriptedGeocoder {
        calls: AtomicUsize,
        address: Option<Address>,
        fail: bool,
    }

    impl ReverseGeocoder for ScriptedGeocoder {
        fn reverse_geocode<'a>(
            &'a self,
            _coordinate: Coordinate,
            _locale: Option<&'a str>,
        ) -> BoxFuture<'a, Result<Option<Address>, GeocodeError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                if self.fail {
                    Err(GeocodeError::Api {
                        status: "UNKNOWN_ERROR".to_string(),
                        message: "boom".to_string(),
                    })
                } else {
                    Ok(self.address.clone())
                }
            })
        }
    }

    fn new_york() -> Address {
        Address {
            locality: Some("New York".to_string()),
            feature_name: Some("70".to_string()),
        }
    }

    #[tokio::test]
    async fn denied_permission_never_touches_provider() {
        let provider = Arc::new(CountingProvider::default());
        let locator = Locator::new(provider.clone(), Arc::new(ScriptedGeocoder::default()));

        for permission in [PermissionSetting::Denied, PermissionSetting::Undetermined] {
            let result = locator.resolve(permission).await;
            assert_eq!(result, Err(LocatorError::PermissionDenied));
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn resolves_coordinate_and_locality() {
        let geocoder = Arc::new(ScriptedGeocoder {
            address: Some(new_york()),
            ..ScriptedGeocoder::default()
        });
        let locator = Locator::new(Arc::new(CountingProvider::default()), geocoder);

        let resolved = locator.resolve(PermissionSetting::Granted).await.unwrap();
        assert_eq!(resolved.coordinate, Some(Coordinate::new(40.73, -73.997)));
        assert_eq!(resolved.place_name.as_deref(), Some("New York"));
    }

    #[tokio::test]
    async fn no_fix_skips_geocoding() {
        let geocoder = Arc::new(ScriptedGeocoder {
            address: Some(new_york()),
            ..ScriptedGeocoder::default()
        });
        let locator = Locator::new(Arc::new(FixedLocationProvider::new(None)), geocoder.clone());

        let resolved = locator.resolve(PermissionSetting::Granted).await.unwrap();
        assert_eq!(resolved, Resolved::unavailable());
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn provider_failure_is_reported_as_unavailable() {
        let provider = Arc::new(CountingProvider {
            fail: true,
            ..CountingProvider::default()
        });
        let geocoder = Arc::new(ScriptedGeocoder::default());
        let locator = Locator::new(provider, geocoder.clone());

        let resolved = locator.resolve(PermissionSetting::Granted).await.unwrap();
        assert_eq!(resolved, Resolved::unavailable());
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn geocoder_failure_keeps_coordinate() {
        let geocoder = Arc::new(ScriptedGeocoder {
            fail: true,
            ..ScriptedGeocoder::default()
        });
        let locator = Locator::new(Arc::new(CountingProvider::default()), geocoder);

        let resolved = locator.resolve(PermissionSetting::Granted).await.unwrap();
        assert_eq!(resolved.coordinate, Some(Coordinate::new(40.73, -73.997)));
        assert!(resolved.place_name.is_none());
    }
}
