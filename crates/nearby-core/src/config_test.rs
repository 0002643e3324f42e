use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("NEARBY_PLACES_API_KEY", "test-key");
    m
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "NEARBY_ENV"));
}

#[test]
fn build_app_config_fails_without_api_key() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "NEARBY_PLACES_API_KEY"),
        "expected MissingEnvVar(NEARBY_PLACES_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_api_key_as_missing() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("NEARBY_PLACES_API_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "NEARBY_PLACES_API_KEY"),
        "expected MissingEnvVar(NEARBY_PLACES_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.places_api_key, "test-key");
    assert_eq!(cfg.places_base_url, "https://maps.googleapis.com");
    assert_eq!(cfg.ip_location_url, "http://ip-api.com");
    assert_eq!(cfg.search_radius_meters, 2000);
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "nearby/0.1 (place-recommendations)");
    assert_eq!(cfg.max_concurrent_requests, 1);
    assert!(cfg.geocode_locale.is_none());
    assert_eq!(cfg.location_permission, PermissionSetting::Undetermined);
    assert!(cfg.fixed_location.is_none());
}

#[test]
fn search_radius_override() {
    let mut map = full_env();
    map.insert("NEARBY_SEARCH_RADIUS_METERS", "500");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.search_radius_meters, 500);
}

#[test]
fn search_radius_invalid() {
    let mut map = full_env();
    map.insert("NEARBY_SEARCH_RADIUS_METERS", "two-km");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NEARBY_SEARCH_RADIUS_METERS"),
        "expected InvalidEnvVar(NEARBY_SEARCH_RADIUS_METERS), got: {result:?}"
    );
}

#[test]
fn request_timeout_invalid() {
    let mut map = full_env();
    map.insert("NEARBY_REQUEST_TIMEOUT_SECS", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NEARBY_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(NEARBY_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn max_concurrent_requests_zero_is_rejected() {
    let mut map = full_env();
    map.insert("NEARBY_MAX_CONCURRENT_REQUESTS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NEARBY_MAX_CONCURRENT_REQUESTS"),
        "expected InvalidEnvVar(NEARBY_MAX_CONCURRENT_REQUESTS), got: {result:?}"
    );
}

#[test]
fn max_concurrent_requests_override() {
    let mut map = full_env();
    map.insert("NEARBY_MAX_CONCURRENT_REQUESTS", "3");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_concurrent_requests, 3);
}

#[test]
fn location_permission_values() {
    for (raw, expected) in [
        ("granted", PermissionSetting::Granted),
        ("DENIED", PermissionSetting::Denied),
        ("prompt", PermissionSetting::Undetermined),
    ] {
        let mut map = full_env();
        map.insert("NEARBY_LOCATION_PERMISSION", raw);
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.location_permission, expected, "raw value {raw}");
    }
}

#[test]
fn location_permission_invalid() {
    let mut map = full_env();
    map.insert("NEARBY_LOCATION_PERMISSION", "maybe");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NEARBY_LOCATION_PERMISSION"),
        "expected InvalidEnvVar(NEARBY_LOCATION_PERMISSION), got: {result:?}"
    );
}

#[test]
fn fixed_location_requires_both_halves() {
    let mut map = full_env();
    map.insert("NEARBY_LATITUDE", "40.730");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "NEARBY_LONGITUDE"),
        "expected MissingEnvVar(NEARBY_LONGITUDE), got: {result:?}"
    );
}

#[test]
fn fixed_location_parses() {
    let mut map = full_env();
    map.insert("NEARBY_LATITUDE", "40.730");
    map.insert("NEARBY_LONGITUDE", "-73.997");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.fixed_location, Some(Coordinate::new(40.730, -73.997)));
}

#[test]
fn fixed_location_out_of_range() {
    let mut map = full_env();
    map.insert("NEARBY_LATITUDE", "91");
    map.insert("NEARBY_LONGITUDE", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NEARBY_LATITUDE"),
        "expected InvalidEnvVar(NEARBY_LATITUDE), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_api_key() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("test-key"), "api key leaked: {rendered}");
    assert!(rendered.contains("[redacted]"));
}
