//! Pokemon normalization
//!
//! The pokemon staging area holds one artifact per batch window; every file
//! in the directory is loaded. The same lenient policy as the species side
//! applies: unreadable or undecodable artifacts are skipped with a log line.

use pokedata_common::PokemonRow;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

/// Stat names as they appear in the upstream `stats` list.
const BASE_STATS: [&str; 6] =
    ["hp", "attack", "defense", "special-attack", "special-defense", "speed"];

/// Load every staged pokemon record from the page artifacts.
pub fn load_pokemon(raw_pokemon_dir: &Path) -> Vec<Value> {
    let entries = match fs::read_dir(raw_pokemon_dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(
                phase = "transform",
                path = %raw_pokemon_dir.display(),
                error = %err,
                "pokemon staging directory unreadable, continuing with no pokemon"
            );
            return Vec::new();
        },
    };

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    // stable load order across runs
    paths.sort();

    let mut pokemon = Vec::new();
    for path in paths {
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(
                    phase = "transform",
                    path = %path.display(),
                    error = %err,
                    "pokemon artifact unreadable, skipping"
                );
                continue;
            },
        };

        match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(records) => pokemon.extend(records),
            Err(err) => {
                error!(
                    phase = "transform",
                    path = %path.display(),
                    error = %err,
                    "pokemon artifact is not valid JSON, skipping"
                );
            },
        }
    }

    info!(phase = "transform", count = pokemon.len(), "loaded pokemon artifacts");
    pokemon
}

/// Flatten one raw pokemon record. Returns `None` (with an error log) for
/// records that are not objects or lack the required identity fields.
pub fn normalize_pokemon(record: &Value) -> Option<PokemonRow> {
    if !record.is_object() {
        error!(phase = "transform", "pokemon record is not a JSON object, skipping");
        return None;
    }

    let Some(pokemon_id) = record.get("id").and_then(Value::as_i64) else {
        error!(phase = "transform", "pokemon record missing numeric id, skipping");
        return None;
    };
    let Some(name) = record.get("name").and_then(Value::as_str) else {
        error!(phase = "transform", pokemon_id, "pokemon record missing name, skipping");
        return None;
    };

    let [hp, attack, defense, special_attack, special_defense, speed] =
        BASE_STATS.map(|stat| base_stat(record, stat));

    Some(PokemonRow {
        pokemon_id,
        name: name.to_string(),
        hp_base_stat: hp,
        attack_base_stat: attack,
        defense_base_stat: defense,
        special_attack_base_stat: special_attack,
        special_defense_base_stat: special_defense,
        speed_base_stat: speed,
        type_1: type_at(record, 0),
        type_2: type_at(record, 1),
    })
}

/// Load and normalize the pokemon side.
pub fn transform_pokemon(raw_pokemon_dir: &Path) -> Vec<PokemonRow> {
    let records = load_pokemon(raw_pokemon_dir);
    let rows: Vec<PokemonRow> = records.iter().filter_map(normalize_pokemon).collect();
    info!(phase = "transform", rows = rows.len(), "pokemon normalized");
    rows
}

/// Look up a base stat by name in the record's `stats` list.
fn base_stat(record: &Value, stat: &str) -> Option<i64> {
    record
        .get("stats")?
        .as_array()?
        .iter()
        .find(|entry| entry.pointer("/stat/name").and_then(Value::as_str) == Some(stat))?
        .get("base_stat")?
        .as_i64()
}

/// Type at the given position in the `types` list, not by slot number.
fn type_at(record: &Value, index: usize) -> Option<String> {
    record
        .get("types")?
        .as_array()?
        .get(index)?
        .pointer("/type/name")?
        .as_str()
        .map(str::to_owned)
}
