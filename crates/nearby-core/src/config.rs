use crate::app_config::{AppConfig, Environment, PermissionSetting};
use crate::places::Coordinate;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it from a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_f64 = |var: &str| -> Result<Option<f64>, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|e| invalid(var, e.to_string())),
            Err(_) => Ok(None),
        }
    };

    let places_api_key = require("NEARBY_PLACES_API_KEY")?;

    let env = parse_environment(&or_default("NEARBY_ENV", "development"))?;
    let log_level = or_default("NEARBY_LOG_LEVEL", "info");
    let places_base_url = or_default("NEARBY_PLACES_BASE_URL", "https://maps.googleapis.com");
    let ip_location_url = or_default("NEARBY_IP_LOCATION_URL", "http://ip-api.com");

    let search_radius_meters = parse_u32("NEARBY_SEARCH_RADIUS_METERS", "2000")?;
    let request_timeout_secs = parse_u64("NEARBY_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("NEARBY_USER_AGENT", "nearby/0.1 (place-recommendations)");

    let max_concurrent_requests = parse_usize("NEARBY_MAX_CONCURRENT_REQUESTS", "1")?;
    if max_concurrent_requests == 0 {
        return Err(invalid(
            "NEARBY_MAX_CONCURRENT_REQUESTS",
            "must be at least 1".to_string(),
        ));
    }

    let geocode_locale = lookup("NEARBY_GEOCODE_LOCALE")
        .ok()
        .filter(|v| !v.trim().is_empty());

    let location_permission =
        parse_permission(&or_default("NEARBY_LOCATION_PERMISSION", "undetermined"))?;

    let latitude = parse_f64("NEARBY_LATITUDE")?;
    let longitude = parse_f64("NEARBY_LONGITUDE")?;
    let fixed_location = match (latitude, longitude) {
        (Some(lat), Some(lon)) => Some(validate_coordinate(lat, lon)?),
        (None, None) => None,
        (Some(_), None) => return Err(ConfigError::MissingEnvVar("NEARBY_LONGITUDE".to_string())),
        (None, Some(_)) => return Err(ConfigError::MissingEnvVar("NEARBY_LATITUDE".to_string())),
    };

    Ok(AppConfig {
        env,
        log_level,
        places_api_key,
        places_base_url,
        ip_location_url,
        search_radius_meters,
        request_timeout_secs,
        user_agent,
        max_concurrent_requests,
        geocode_locale,
        location_permission,
        fixed_location,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "NEARBY_ENV".to_string(),
            reason: format!("expected development, test, or production; got \"{other}\""),
        }),
    }
}

fn parse_permission(s: &str) -> Result<PermissionSetting, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "granted" => Ok(PermissionSetting::Granted),
        "denied" => Ok(PermissionSetting::Denied),
        "undetermined" | "prompt" => Ok(PermissionSetting::Undetermined),
        other => Err(ConfigError::InvalidEnvVar {
            var: "NEARBY_LOCATION_PERMISSION".to_string(),
            reason: format!("expected granted, denied, or undetermined; got \"{other}\""),
        }),
    }
}

fn validate_coordinate(latitude: f64, longitude: f64) -> Result<Coordinate, ConfigError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ConfigError::InvalidEnvVar {
            var: "NEARBY_LATITUDE".to_string(),
            reason: format!("{latitude} is outside [-90, 90]"),
        });
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(ConfigError::InvalidEnvVar {
            var: "NEARBY_LONGITUDE".to_string(),
            reason: format!("{longitude} is outside [-180, 180]"),
        });
    }
    Ok(Coordinate::new(latitude, longitude))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
