//! Pokedata ETL Library
//!
//! Batch pipeline that extracts species and pokemon records from a paginated
//! REST API, reconciles them into one denormalized table, and persists the
//! result as Parquet, CSV, and a PostgreSQL table.
//!
//! # Phases
//!
//! - **extract**: concurrent windowed retrieval of the pokemon index plus
//!   per-generation species retrieval, checkpointed as raw JSON staging
//!   artifacts
//! - **transform**: null-safe flattening of both staged sides and a right
//!   join onto the species set, written as Snappy Parquet and CSV
//! - **load**: full-replace load of the processed table into PostgreSQL
//!
//! # Example
//!
//! ```no_run
//! use pokedata_etl::{EtlPipeline, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pipeline = EtlPipeline::new(PipelineConfig::load()?)?;
//!     pipeline.run().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod storage;
pub mod transform;

pub use client::ApiClient;
pub use config::PipelineConfig;
pub use error::{EtlError, Result};
pub use pipeline::{EtlPipeline, TransformStats};
