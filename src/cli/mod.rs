use std::time::Duration;

use clap::{Parser, Subcommand};
use cookcal_api::{CalendarBackend, FixtureBackend, HttpBackend, HttpBackendConfig};
use cookcal_calendar::{CalendarRangeCache, CoverageMode};
use cookcal_shared::DateRange;

use crate::Config;

mod check;
mod delete;
mod range;

pub use check::{CheckReport, check_coverage};
pub use delete::delete_meal;
pub use range::{RangeReport, load_range, print_range};

/// cookcal - recipe calendar client
#[derive(Parser, Debug)]
#[command(name = "cookcal")]
#[command(about = "Fetch and inspect the recipe calendar", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a date window and print its meals
    Range {
        /// First day of the window (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// Last day of the window, inclusive (YYYY-MM-DD)
        #[arg(long)]
        end: String,

        /// Refetch even when the window is cached
        #[arg(long)]
        force: bool,

        /// Print JSON instead of a day listing
        #[arg(long)]
        json: bool,
    },
    /// Delete a scheduled meal
    Delete {
        meal_id: i64,
    },
    /// Request a window twice and report whether the second one hit the cache
    Check {
        #[arg(long)]
        start: String,

        #[arg(long)]
        end: String,

        /// Coverage mode to check with instead of `calendar.coverage`
        #[arg(long)]
        coverage: Option<CoverageMode>,
    },
}

pub type DynBackend = Box<dyn CalendarBackend>;

/// Backend selected by `calendar.offline`.
pub async fn backend(config: &Config) -> anyhow::Result<DynBackend> {
    if config.calendar.offline {
        let Some(path) = &config.calendar.fixtures else {
            anyhow::bail!("calendar.fixtures must be set when calendar.offline is on");
        };

        let fixture = FixtureBackend::from_file(path).await?;
        tracing::info!(path = %path.display(), meals = fixture.meals().len(), "serving fixtures");

        return Ok(Box::new(fixture));
    }

    let backend = HttpBackend::new(HttpBackendConfig {
        base_url: config.api.base_url.clone(),
        access_token: config.api.access_token.clone(),
        timeout: config.api.timeout_secs.map(Duration::from_secs),
    })?;

    Ok(Box::new(backend))
}

pub async fn cache(config: &Config) -> anyhow::Result<CalendarRangeCache<DynBackend>> {
    let backend = backend(config).await?;

    Ok(CalendarRangeCache::with_coverage(
        backend,
        config.calendar.coverage,
    ))
}

fn parse_range(start: &str, end: &str) -> anyhow::Result<DateRange> {
    DateRange::parse(start, end).map_err(|e| anyhow::anyhow!("invalid window {start}..{end}: {e}"))
}
