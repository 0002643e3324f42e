//! Shared domain types and configuration for the nearby-places pipeline.

pub mod app_config;
pub mod config;
pub mod places;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, PermissionSetting};
pub use config::{load_app_config, load_app_config_from_env};
pub use places::{
    Category, CategoryResults, Coordinate, RecommendationResult, UnknownCategory,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
