use anyhow::Result;
use clap::Parser;
use cookcal::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = cookcal::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    cookcal::observability::init_observability(
        "cookcal",
        env!("CARGO_PKG_VERSION"),
        &config.observability,
    )?;

    if let Commands::Check {
        coverage: Some(mode),
        ..
    } = &cli.command
    {
        config.calendar.coverage = *mode;
    }

    let cache = cli::cache(&config).await?;

    match cli.command {
        Commands::Range {
            start,
            end,
            force,
            json,
        } => {
            let report = cli::load_range(&cache, &start, &end, force).await?;
            cli::print_range(&report, json)?;
        }
        Commands::Delete { meal_id } => cli::delete_meal(&cache, meal_id).await?,
        Commands::Check { start, end, .. } => {
            let report = cli::check_coverage(&cache, &start, &end).await?;
            println!(
                "coverage={} first={} second={}",
                report.mode, report.first, report.second
            );

            if !report.served_from_cache() {
                tracing::warn!("second request for the same window was not served from cache");
            }
        }
    }

    Ok(())
}
