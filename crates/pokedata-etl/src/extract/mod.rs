//! Extraction phase
//!
//! Index listing, windowed concurrent pokemon retrieval, and per-generation
//! species retrieval. Raw records are checkpointed to the staging area as
//! one JSON-array artifact per batch window or generation; the transform
//! phase consumes those artifacts, never the network.

pub mod batch;
pub mod generations;
pub mod listing;

pub use batch::BatchRetriever;
pub use generations::GenerationRetriever;
pub use listing::{list_generations, list_pokemon_urls, EntityRef};

use crate::error::Result;
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Persist one staging artifact: an ordered JSON array of raw records.
/// Artifacts are written once and never mutated.
pub(crate) fn write_artifact(path: &Path, records: &[Value]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}
