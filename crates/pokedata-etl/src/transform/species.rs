//! Species normalization
//!
//! One staged artifact per generation, each an array of raw species records.
//! A missing or undecodable artifact is skipped with a log line; a requested
//! generation that was absent upstream never produced an artifact, so the
//! transform must tolerate the gap.

use pokedata_common::SpeciesRow;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

/// Load every staged species record for the given generations.
pub fn load_species(raw_species_dir: &Path, generations: &[String]) -> Vec<Value> {
    let mut species = Vec::new();

    for generation in generations {
        let path = raw_species_dir.join(format!("{generation}.json"));
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(
                    phase = "transform",
                    path = %path.display(),
                    error = %err,
                    "species artifact unreadable, skipping generation"
                );
                continue;
            },
        };

        match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(records) => {
                info!(
                    phase = "transform",
                    generation = %generation,
                    count = records.len(),
                    "loaded species artifact"
                );
                species.extend(records);
            },
            Err(err) => {
                error!(
                    phase = "transform",
                    path = %path.display(),
                    error = %err,
                    "species artifact is not valid JSON, skipping"
                );
            },
        }
    }

    species
}

/// Flatten one raw species record. Returns `None` (with an error log) for
/// records that are not objects or lack the required identity fields; a bad
/// record never fails the batch.
pub fn normalize_species(record: &Value) -> Option<SpeciesRow> {
    if !record.is_object() {
        error!(phase = "transform", "species record is not a JSON object, skipping");
        return None;
    }

    let Some(species_id) = record.get("id").and_then(Value::as_i64) else {
        error!(phase = "transform", "species record missing numeric id, skipping");
        return None;
    };
    let Some(name) = record.get("name").and_then(Value::as_str) else {
        error!(phase = "transform", species_id, "species record missing name, skipping");
        return None;
    };
    let Some(color) = nested_name(record, "color") else {
        error!(phase = "transform", species_id, "species record missing color, skipping");
        return None;
    };
    let Some(generation) = nested_name(record, "generation") else {
        error!(phase = "transform", species_id, "species record missing generation, skipping");
        return None;
    };

    Some(SpeciesRow {
        species_id,
        name: name.to_string(),
        color,
        habitat: nested_name(record, "habitat"),
        generation,
        previous_evolution: nested_name(record, "evolves_from_species"),
        is_mythical: record.get("is_mythical").and_then(Value::as_bool).unwrap_or_default(),
        is_baby: record.get("is_baby").and_then(Value::as_bool).unwrap_or_default(),
        is_legendary: record.get("is_legendary").and_then(Value::as_bool).unwrap_or_default(),
        nat_pokedex_entry: national_pokedex_entry(record),
    })
}

/// Load and normalize the species side for the given generations.
pub fn transform_species(raw_species_dir: &Path, generations: &[String]) -> Vec<SpeciesRow> {
    let records = load_species(raw_species_dir, generations);
    let rows: Vec<SpeciesRow> = records.iter().filter_map(normalize_species).collect();
    info!(phase = "transform", rows = rows.len(), "species normalized");
    rows
}

/// `record[key]["name"]` when the whole path is present and non-null.
fn nested_name(record: &Value, key: &str) -> Option<String> {
    record.get(key)?.get("name")?.as_str().map(str::to_owned)
}

/// The `entry_number` of the pokedex entry named "national", if any.
fn national_pokedex_entry(record: &Value) -> Option<i64> {
    record
        .get("pokedex_numbers")?
        .as_array()?
        .iter()
        .find(|entry| entry.pointer("/pokedex/name").and_then(Value::as_str) == Some("national"))?
        .get("entry_number")?
        .as_i64()
}
