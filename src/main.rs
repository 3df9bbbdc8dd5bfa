use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use classy_ui::RunOptions;

/// Type a place, get its multi-day forecast.
#[derive(Debug, Parser)]
#[command(name = "classy-weather", version, about)]
struct Cli {
    /// Location to look up first
    query: Option<String>,

    /// Look up QUERY once, print the forecast and exit
    #[arg(long)]
    once: bool,

    /// Config file (default: <config dir>/classy-weather/config.toml)
    #[arg(long, env = "CLASSY_WEATHER_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let log_filter = classy_core::init();

    let (config, validation) = classy_core::Config::load_validated(cli.config.as_deref())
        .context("Failed to load configuration")?;
    log_filter.apply(&config.display.log_level);

    for warning in &validation.warnings {
        tracing::warn!("Config warning: {}", warning);
    }

    tracing::info!("Classy Weather started");

    // Lookups are cooperative: one thread, one chain at a time.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let options = RunOptions {
        initial_query: cli.query,
        once: cli.once,
    };
    let shown = runtime.block_on(classy_ui::run(&config, options))?;

    tracing::info!("Classy Weather stopped");

    if cli.once && !shown {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
