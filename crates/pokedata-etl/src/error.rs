//! Error types for the ETL pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ETL operations
pub type Result<T> = std::result::Result<T, EtlError>;

/// Error types for the extract, transform, and load phases
#[derive(Error, Debug)]
pub enum EtlError {
    /// Non-success HTTP status from the upstream API. Aborts the enclosing
    /// batch or generation; retry policy belongs to the caller.
    #[error("HTTP {status} fetching {url}")]
    RemoteFetch { status: u16, url: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Required processed artifact absent when loading.
    #[error("Missing artifact: {0}")]
    MissingArtifact(PathBuf),

    #[error("Columnar encoding error: {0}")]
    Columnar(String),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
