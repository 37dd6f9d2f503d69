//! Pokedata ETL - pipeline entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use pokedata_common::logging::{init_logging, LogConfig, LogLevel};
use pokedata_etl::{EtlPipeline, PipelineConfig};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "pokedata-etl")]
#[command(author, version, about = "Pokedata batch ETL pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch raw pokemon and species records into the staging area
    Extract,
    /// Normalize staged records, join them, and write Parquet + CSV
    Transform,
    /// Load the processed Parquet into PostgreSQL
    Load,
    /// Run extract, transform, and load in sequence
    Run,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env()?;
    if cli.verbose {
        log_config = log_config.with_level(LogLevel::Debug);
    }
    init_logging(&log_config)?;

    let config = PipelineConfig::load()?;
    let pipeline = EtlPipeline::new(config)?;

    match cli.command {
        Command::Extract => pipeline.run_extract().await?,
        Command::Transform => {
            let stats = pipeline.run_transform()?;
            info!(
                species = stats.species_rows,
                pokemon = stats.pokemon_rows,
                combined = stats.combined_rows,
                "transform complete"
            );
        },
        Command::Load => {
            let rows = pipeline.run_load().await?;
            info!(rows, "load complete");
        },
        Command::Run => {
            let rows = pipeline.run().await?;
            info!(rows, "pipeline complete");
        },
    }

    Ok(())
}
