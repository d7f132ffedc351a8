mod logging;
mod settings;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use thiserror::Error;
use warehouse_seed_generate::{GenerateOptions, GenerationEngine, GenerationError};

use logging::init_logging;
use settings::load_config;

#[derive(Debug, Error)]
enum CliError {
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "warehouse-seed",
    version,
    about = "Generate SQL seed data for shipments and returns"
)]
struct Cli {
    /// Output path for the SQL file.
    #[arg(long, default_value = "generated_data.sql")]
    out: PathBuf,
    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of shipments to generate.
    #[arg(long, value_name = "N")]
    shipments: Option<u32>,
    /// TOML file overriding the built-in catalog.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Reference date used instead of today.
    #[arg(long, value_name = "YYYY-MM-DD")]
    as_of: Option<NaiveDate>,
    /// Optional output path for the JSON run report.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
    /// Write JSON logs to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(shipments) = cli.shipments {
        config.shipment_count = shipments;
    }

    let generated_at = match cli.as_of {
        Some(date) => Some(date.and_hms_opt(12, 0, 0).ok_or_else(|| {
            CliError::InvalidArgument(format!("cannot build a timestamp for {date}"))
        })?),
        None => None,
    };

    let options = GenerateOptions {
        out_path: cli.out,
        seed: cli.seed,
        generated_at,
        report_path: cli.report,
    };

    tracing::info!(event = "run_started", out = %options.out_path.display());
    let result = GenerationEngine::new(config, options).run()?;
    let counts = result.report.counts;
    tracing::info!(
        event = "run_finished",
        status = "success",
        seed = result.report.seed,
        duration_ms = result.report.duration_ms
    );

    println!(
        "Generated {} shipments with {} items",
        counts.shipments, counts.shipment_items
    );
    println!(
        "Generated {} returns with {} items",
        counts.returns, counts.return_items
    );
    println!("SQL file saved to: {}", result.output_path.display());

    Ok(())
}
