use crate::places::Coordinate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Location access as granted by the host environment before a cycle starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionSetting {
    Granted,
    Denied,
    /// The user has not decided yet; the caller must ask before locating.
    Undetermined,
}

impl std::fmt::Display for PermissionSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionSetting::Granted => write!(f, "granted"),
            PermissionSetting::Denied => write!(f, "denied"),
            PermissionSetting::Undetermined => write!(f, "undetermined"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Credential shared by the places search and reverse geocoding calls.
    pub places_api_key: String,
    pub places_base_url: String,
    pub ip_location_url: String,
    pub search_radius_meters: u32,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_concurrent_requests: usize,
    pub geocode_locale: Option<String>,
    pub location_permission: PermissionSetting,
    pub fixed_location: Option<Coordinate>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("places_api_key", &"[redacted]")
            .field("places_base_url", &self.places_base_url)
            .field("ip_location_url", &self.ip_location_url)
            .field("search_radius_meters", &self.search_radius_meters)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .field("geocode_locale", &self.geocode_locale)
            .field("location_permission", &self.location_permission)
            .field("fixed_location", &self.fixed_location)
            .finish()
    }
}
