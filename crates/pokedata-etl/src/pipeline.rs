//! Pipeline orchestration
//!
//! Ties the phases together over one configuration value. Each phase is also
//! runnable on its own, so a failed run can be resumed from the staging or
//! processed artifacts it left behind.

use crate::client::ApiClient;
use crate::config::PipelineConfig;
use crate::db;
use crate::error::Result;
use crate::extract::{self, BatchRetriever, GenerationRetriever};
use crate::storage;
use crate::transform;
use tracing::info;

/// Row counts produced by the transform phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformStats {
    pub species_rows: usize,
    pub pokemon_rows: usize,
    pub combined_rows: usize,
}

/// End-to-end ETL pipeline over one configuration.
pub struct EtlPipeline {
    config: PipelineConfig,
    client: ApiClient,
}

impl EtlPipeline {
    /// Build the pipeline and its shared HTTP client.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let client = ApiClient::new(config.api.timeout_secs)?;
        Ok(EtlPipeline { config, client })
    }

    /// Extract: list both collections and checkpoint raw artifacts to the
    /// staging area.
    pub async fn run_extract(&self) -> Result<()> {
        info!(phase = "extract", "starting extraction");
        self.config.paths.ensure_dirs()?;

        let urls = extract::list_pokemon_urls(
            &self.client,
            &self.config.api.base_url,
            self.config.api.list_limit,
        )
        .await?;
        BatchRetriever::new(
            &self.client,
            &self.config.paths.raw_pokemon_dir,
            "pokemon",
            self.config.api.batch_size,
        )
        .fetch_all(&urls)
        .await?;

        let generations = extract::list_generations(
            &self.client,
            &self.config.api.base_url,
            &self.config.api.generations,
        )
        .await?;
        GenerationRetriever::new(&self.client, &self.config.paths.raw_species_dir)
            .fetch_all(&generations)
            .await?;

        info!(phase = "extract", "extraction finished");
        Ok(())
    }

    /// Transform: normalize both staged sides, reconcile, and write the
    /// processed Parquet and CSV outputs.
    pub fn run_transform(&self) -> Result<TransformStats> {
        info!(phase = "transform", "starting transform");
        self.config.paths.ensure_dirs()?;

        let species = transform::transform_species(
            &self.config.paths.raw_species_dir,
            &self.config.api.generations,
        );
        let pokemon = transform::transform_pokemon(&self.config.paths.raw_pokemon_dir);

        let stats = TransformStats {
            species_rows: species.len(),
            pokemon_rows: pokemon.len(),
            combined_rows: 0,
        };
        let combined = transform::reconcile(species, pokemon);
        let stats = TransformStats {
            combined_rows: combined.len(),
            ..stats
        };

        storage::write_parquet(
            &combined,
            &self.config.paths.processed_dir.join(&self.config.output.parquet_name),
        )?;
        storage::write_csv(
            &combined,
            &self.config.paths.processed_dir.join(&self.config.output.csv_name),
        )?;

        info!(phase = "transform", combined = stats.combined_rows, "transform finished");
        Ok(stats)
    }

    /// Load: read the processed Parquet back and full-replace the
    /// destination table.
    pub async fn run_load(&self) -> Result<u64> {
        info!(phase = "load", "starting load");

        let path = self.config.paths.processed_dir.join(&self.config.output.parquet_name);
        let rows = storage::read_parquet(&path)?;

        let pool = db::connect(&self.config.database).await?;
        let loaded = db::load_full_replace(&pool, &self.config.database.table_name, &rows).await?;

        info!(phase = "load", rows = loaded, "load finished");
        Ok(loaded)
    }

    /// Run extract, transform, and load in sequence.
    pub async fn run(&self) -> Result<u64> {
        self.run_extract().await?;
        self.run_transform()?;
        self.run_load().await
    }
}
