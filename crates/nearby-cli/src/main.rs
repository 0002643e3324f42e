mod prompt;
mod render;
mod session;
mod setup;

use std::time::Duration;

use clap::{Parser, ValueEnum};
use nearby_core::{Category, Coordinate, RecommendationResult};
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

use crate::render::{render_screen, PERMISSION_DENIED};
use crate::session::{CycleOutcome, RecommendationSession, Trigger};
use crate::setup::{build_pipeline, Overrides};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "nearby")]
#[command(about = "Recommend parks, malls, and attractions near the current location")]
struct Cli {
    /// Device latitude; overrides `NEARBY_LATITUDE`.
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Device longitude; overrides `NEARBY_LONGITUDE`.
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Search radius in meters; overrides `NEARBY_SEARCH_RADIUS_METERS`.
    #[arg(long)]
    radius: Option<u32>,

    /// Category to query (repeatable). Defaults to all three.
    #[arg(long = "category", value_parser = parse_category)]
    categories: Vec<Category>,

    /// Grant location access without asking.
    #[arg(short = 'y', long = "yes")]
    grant: bool,

    /// Skip reverse geocoding.
    #[arg(long)]
    no_geocode: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "NEARBY_FORMAT")]
    format: OutputFormat,

    /// Re-run every N seconds until interrupted. Refreshes that land while a
    /// fetch is still loading are skipped.
    #[arg(long, value_name = "SECS")]
    refresh_every: Option<u64>,
}

fn parse_category(raw: &str) -> Result<Category, String> {
    raw.parse::<Category>().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = nearby_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?config, "configuration loaded");

    let overrides = Overrides {
        location: cli.lat.zip(cli.lon).map(|(lat, lon)| Coordinate::new(lat, lon)),
        radius_meters: cli.radius,
        categories: cli.categories.clone(),
        grant_permission: cli.grant,
        skip_geocoding: cli.no_geocode,
    };
    let session = RecommendationSession::new(build_pipeline(&config, &overrides)?);

    match cli.refresh_every {
        Some(secs) => run_refreshing(&session, cli.format, Duration::from_secs(secs.max(1))).await,
        None => run_once(&session, cli.format).await,
    }
}

async fn run_once(session: &RecommendationSession, format: OutputFormat) -> anyhow::Result<()> {
    let Trigger::Started(rx) = session.trigger() else {
        return Ok(());
    };
    if format == OutputFormat::Text {
        eprint!("{}", render_screen(true, &RecommendationResult::default()));
    }
    let outcome = rx.await?;
    present(&outcome, format)
}

async fn run_refreshing(
    session: &RecommendationSession,
    format: OutputFormat,
    every: Duration,
) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut pending: Option<oneshot::Receiver<CycleOutcome>> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => match session.trigger() {
                Trigger::Started(rx) => pending = Some(rx),
                Trigger::Ignored => tracing::info!(
                    status = ?session.status(),
                    "refresh skipped; previous fetch still loading"
                ),
            },
            outcome = wait_pending(&mut pending) => {
                pending = None;
                present(&outcome?, format)?;
            }
            result = tokio::signal::ctrl_c() => {
                result?;
                tracing::info!("interrupted; stopping refresh loop");
                return Ok(());
            }
        }
    }
}

/// Awaits the in-flight outcome, or never resolves when nothing is pending.
async fn wait_pending(
    pending: &mut Option<oneshot::Receiver<CycleOutcome>>,
) -> Result<CycleOutcome, oneshot::error::RecvError> {
    match pending.as_mut() {
        Some(rx) => rx.await,
        None => std::future::pending().await,
    }
}

fn present(outcome: &CycleOutcome, format: OutputFormat) -> anyhow::Result<()> {
    match (outcome, format) {
        (CycleOutcome::PermissionDenied, _) => eprintln!("{PERMISSION_DENIED}"),
        (CycleOutcome::Delivered(result), OutputFormat::Text) => {
            print!("{}", render_screen(false, result));
        }
        (CycleOutcome::Delivered(result), OutputFormat::Json) => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_negative_coordinates_and_categories() {
        let cli = Cli::try_parse_from([
            "nearby",
            "--lat",
            "40.730",
            "--lon",
            "-73.997",
            "--category",
            "park",
            "--category",
            "shopping_mall",
            "--yes",
        ])
        .expect("arguments should parse");

        assert_eq!(cli.lat, Some(40.730));
        assert_eq!(cli.lon, Some(-73.997));
        assert_eq!(cli.categories, vec![Category::Park, Category::ShoppingMall]);
        assert!(cli.grant);
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn cli_rejects_unknown_category() {
        let result = Cli::try_parse_from(["nearby", "--category", "museum"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_requires_both_coordinates() {
        let result = Cli::try_parse_from(["nearby", "--lat", "40.7"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_accepts_json_format() {
        let cli = Cli::try_parse_from(["nearby", "--format", "json", "--refresh-every", "30"])
            .expect("arguments should parse");
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.refresh_every, Some(30));
    }
}
