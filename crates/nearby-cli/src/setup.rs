//! Builds the pipeline collaborators from configuration and flags.

use std::io::IsTerminal;
use std::sync::Arc;

use nearby_core::{AppConfig, Category, Coordinate, PermissionSetting};
use nearby_locator::{
    FixedLocationProvider, GoogleGeocoder, IpLocationProvider, LocationProvider, Locator,
    NoopGeocoder, PermissionGate, ReverseGeocoder, StaticPermission,
};
use nearby_places::{NearbyQuery, PlacesClient};

use crate::prompt::PromptPermission;
use crate::session::Pipeline;

/// Per-invocation choices that override or extend [`AppConfig`].
#[derive(Debug, Default)]
pub struct Overrides {
    pub location: Option<Coordinate>,
    pub radius_meters: Option<u32>,
    pub categories: Vec<Category>,
    pub grant_permission: bool,
    pub skip_geocoding: bool,
}

pub fn build_pipeline(config: &AppConfig, overrides: &Overrides) -> anyhow::Result<Pipeline> {
    let places = PlacesClient::with_base_url(
        &config.places_api_key,
        config.request_timeout_secs,
        &config.user_agent,
        &config.places_base_url,
    )?
    .with_max_concurrent_requests(config.max_concurrent_requests);

    let locator = Locator::new(
        build_location_provider(config, overrides)?,
        build_geocoder(config, overrides)?,
    )
    .with_locale(config.geocode_locale.clone());

    Ok(Pipeline {
        permission: build_permission_gate(config, overrides),
        locator,
        places,
        query: build_query(config, overrides),
    })
}

fn build_query(config: &AppConfig, overrides: &Overrides) -> NearbyQuery {
    let mut query =
        NearbyQuery::with_radius(overrides.radius_meters.unwrap_or(config.search_radius_meters));
    if !overrides.categories.is_empty() {
        query.categories.clone_from(&overrides.categories);
    }
    query
}

/// A known coordinate wins; otherwise fall back to IP-based lookup.
fn build_location_provider(
    config: &AppConfig,
    overrides: &Overrides,
) -> anyhow::Result<Arc<dyn LocationProvider>> {
    if let Some(coordinate) = overrides.location.or(config.fixed_location) {
        tracing::debug!(%coordinate, "using fixed device location");
        return Ok(Arc::new(FixedLocationProvider::new(Some(coordinate))));
    }
    tracing::debug!(url = %config.ip_location_url, "using ip-based device location");
    Ok(Arc::new(IpLocationProvider::with_base_url(
        config.request_timeout_secs,
        &config.user_agent,
        &config.ip_location_url,
    )?))
}

fn build_geocoder(
    config: &AppConfig,
    overrides: &Overrides,
) -> anyhow::Result<Arc<dyn ReverseGeocoder>> {
    if overrides.skip_geocoding {
        return Ok(Arc::new(NoopGeocoder));
    }
    Ok(Arc::new(GoogleGeocoder::with_base_url(
        &config.places_api_key,
        config.request_timeout_secs,
        &config.user_agent,
        &config.places_base_url,
    )?))
}

/// `--yes` grants outright. An undetermined setting prompts only when stdin
/// is a terminal; otherwise it settles on denied.
fn build_permission_gate(config: &AppConfig, overrides: &Overrides) -> Arc<dyn PermissionGate> {
    if overrides.grant_permission {
        return Arc::new(StaticPermission(PermissionSetting::Granted));
    }
    match config.location_permission {
        PermissionSetting::Undetermined if std::io::stdin().is_terminal() => {
            Arc::new(PromptPermission::new(PermissionSetting::Undetermined))
        }
        setting => Arc::new(StaticPermission(setting)),
    }
}
