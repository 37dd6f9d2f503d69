//! Configuration management
//!
//! The pipeline configuration is an explicit value passed into each
//! component entry point; there is no process-wide singleton. Everything is
//! loaded from environment variables (with `.env` support) and validated
//! once at startup.

use crate::error::{EtlError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Configuration Constants
// ============================================================================

/// Default upstream API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2/";

/// Default comma-separated list of generations to process.
pub const DEFAULT_GENERATIONS: &str = "generation-i";

/// Default batch window size for concurrent pokemon fetches.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Default page limit for the pokemon index listing. Sized to cover the full
/// known catalog in a single page; overflow is detected and warned about,
/// not paginated.
pub const DEFAULT_LIST_LIMIT: usize = 2000;

/// Default HTTP request timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default root directory for staging and processed data.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Default processed Parquet file name.
pub const DEFAULT_PARQUET_NAME: &str = "pokemons.parquet";

/// Default processed CSV file name.
pub const DEFAULT_CSV_NAME: &str = "pokemons.csv";

/// Default destination table name.
pub const DEFAULT_TABLE_NAME: &str = "pokemons";

/// Default database URL for local development.
pub const DEFAULT_DATABASE_URL: &str = "postgresql://localhost/pokedata";

/// Default maximum database connections in the pool.
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub api: ApiConfig,
    pub paths: PathConfig,
    pub database: DatabaseConfig,
    pub output: OutputConfig,
}

/// Upstream API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, trailing slash required (endpoints are appended directly).
    pub base_url: String,
    /// Generation names to extract species for.
    pub generations: Vec<String>,
    /// Batch window size: number of concurrent fetches per persisted page.
    pub batch_size: usize,
    /// Single-page limit for the pokemon index listing.
    pub list_limit: usize,
    pub timeout_secs: u64,
}

/// Staging and processed data locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    pub raw_pokemon_dir: PathBuf,
    pub raw_species_dir: PathBuf,
    pub processed_dir: PathBuf,
}

/// Destination database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub table_name: String,
}

/// Processed output file names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub parquet_name: String,
    pub csv_name: String,
}

impl PipelineConfig {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let data_dir = PathBuf::from(
            std::env::var("POKEDATA_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string()),
        );

        let config = PipelineConfig {
            api: ApiConfig {
                base_url: std::env::var("POKEDATA_API_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
                generations: std::env::var("POKEDATA_GENERATIONS")
                    .unwrap_or_else(|_| DEFAULT_GENERATIONS.to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                batch_size: std::env::var("POKEDATA_BATCH_SIZE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_BATCH_SIZE),
                list_limit: std::env::var("POKEDATA_LIST_LIMIT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_LIST_LIMIT),
                timeout_secs: std::env::var("POKEDATA_HTTP_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            },
            paths: PathConfig {
                raw_pokemon_dir: data_dir.join("raw").join("pokemon"),
                raw_species_dir: data_dir.join("raw").join("species"),
                processed_dir: data_dir.join("processed"),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS),
                table_name: std::env::var("POKEDATA_TABLE_NAME")
                    .unwrap_or_else(|_| DEFAULT_TABLE_NAME.to_string()),
            },
            output: OutputConfig {
                parquet_name: std::env::var("POKEDATA_PARQUET_NAME")
                    .unwrap_or_else(|_| DEFAULT_PARQUET_NAME.to_string()),
                csv_name: std::env::var("POKEDATA_CSV_NAME")
                    .unwrap_or_else(|_| DEFAULT_CSV_NAME.to_string()),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.is_empty() {
            return Err(EtlError::Config("API base URL must not be empty".to_string()));
        }
        if !self.api.base_url.ends_with('/') {
            return Err(EtlError::Config(format!(
                "API base URL must end with '/': {}",
                self.api.base_url
            )));
        }
        if self.api.generations.is_empty() {
            return Err(EtlError::Config(
                "At least one generation must be configured".to_string(),
            ));
        }
        if self.api.batch_size == 0 {
            return Err(EtlError::Config("Batch size must be greater than zero".to_string()));
        }
        if self.api.list_limit == 0 {
            return Err(EtlError::Config("List limit must be greater than zero".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(EtlError::Config(
                "Database pool must allow at least one connection".to_string(),
            ));
        }
        validate_table_name(&self.database.table_name)?;
        Ok(())
    }
}

impl PathConfig {
    /// Create the staging and processed directories if absent.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.raw_pokemon_dir, &self.raw_species_dir, &self.processed_dir] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

/// The table name is interpolated into DDL, so restrict it to a safe
/// identifier charset up front.
fn validate_table_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(EtlError::Config(format!("Invalid table name: {name:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> PipelineConfig {
        PipelineConfig {
            api: ApiConfig {
                base_url: DEFAULT_API_BASE_URL.to_string(),
                generations: vec!["generation-i".to_string()],
                batch_size: DEFAULT_BATCH_SIZE,
                list_limit: DEFAULT_LIST_LIMIT,
                timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            },
            paths: PathConfig {
                raw_pokemon_dir: PathBuf::from("./data/raw/pokemon"),
                raw_species_dir: PathBuf::from("./data/raw/species"),
                processed_dir: PathBuf::from("./data/processed"),
            },
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
                table_name: DEFAULT_TABLE_NAME.to_string(),
            },
            output: OutputConfig {
                parquet_name: DEFAULT_PARQUET_NAME.to_string(),
                csv_name: DEFAULT_CSV_NAME.to_string(),
            },
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_base_url_requires_trailing_slash() {
        let mut config = test_config();
        config.api.base_url = "https://pokeapi.co/api/v2".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_generations_rejected() {
        let mut config = test_config();
        config.api.generations.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let mut config = test_config();
        config.api.batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_table_name_charset() {
        assert!(validate_table_name("pokemons").is_ok());
        assert!(validate_table_name("_staging_2").is_ok());
        assert!(validate_table_name("1pokemons").is_err());
        assert!(validate_table_name("pokemons; drop table x").is_err());
        assert!(validate_table_name("").is_err());
    }
}
