//! Processed-table persistence
//!
//! The combined table is written twice: a Snappy-compressed Parquet file
//! (read back by the load phase) and a CSV file for ad-hoc consumers. Both
//! carry the same 19 columns; the Parquet round-trip preserves values and
//! nulls exactly.

use crate::error::{EtlError, Result};
use arrow::array::{Array, ArrayRef, BooleanArray, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use pokedata_common::CombinedRow;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

fn combined_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("species_id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("color", DataType::Utf8, false),
        Field::new("habitat", DataType::Utf8, true),
        Field::new("generation", DataType::Utf8, false),
        Field::new("previous_evolution", DataType::Utf8, true),
        Field::new("is_mythical", DataType::Boolean, false),
        Field::new("is_baby", DataType::Boolean, false),
        Field::new("is_legendary", DataType::Boolean, false),
        Field::new("nat_pokedex_entry", DataType::Int64, true),
        Field::new("pokemon_id", DataType::Int64, true),
        Field::new("hp_base_stat", DataType::Int64, true),
        Field::new("attack_base_stat", DataType::Int64, true),
        Field::new("defense_base_stat", DataType::Int64, true),
        Field::new("special_attack_base_stat", DataType::Int64, true),
        Field::new("special_defense_base_stat", DataType::Int64, true),
        Field::new("speed_base_stat", DataType::Int64, true),
        Field::new("type_1", DataType::Utf8, true),
        Field::new("type_2", DataType::Utf8, true),
    ]))
}

fn to_record_batch(rows: &[CombinedRow]) -> Result<RecordBatch> {
    let schema = combined_schema();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(rows.iter().map(|r| r.species_id).collect::<Vec<_>>())),
        Arc::new(StringArray::from(rows.iter().map(|r| r.name.as_str()).collect::<Vec<_>>())),
        Arc::new(StringArray::from(rows.iter().map(|r| r.color.as_str()).collect::<Vec<_>>())),
        Arc::new(StringArray::from(rows.iter().map(|r| r.habitat.as_deref()).collect::<Vec<_>>())),
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.generation.as_str()).collect::<Vec<_>>(),
        )),
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.previous_evolution.as_deref()).collect::<Vec<_>>(),
        )),
        Arc::new(BooleanArray::from(rows.iter().map(|r| r.is_mythical).collect::<Vec<_>>())),
        Arc::new(BooleanArray::from(rows.iter().map(|r| r.is_baby).collect::<Vec<_>>())),
        Arc::new(BooleanArray::from(rows.iter().map(|r| r.is_legendary).collect::<Vec<_>>())),
        Arc::new(Int64Array::from(rows.iter().map(|r| r.nat_pokedex_entry).collect::<Vec<_>>())),
        Arc::new(Int64Array::from(rows.iter().map(|r| r.pokemon_id).collect::<Vec<_>>())),
        Arc::new(Int64Array::from(rows.iter().map(|r| r.hp_base_stat).collect::<Vec<_>>())),
        Arc::new(Int64Array::from(rows.iter().map(|r| r.attack_base_stat).collect::<Vec<_>>())),
        Arc::new(Int64Array::from(rows.iter().map(|r| r.defense_base_stat).collect::<Vec<_>>())),
        Arc::new(Int64Array::from(
            rows.iter().map(|r| r.special_attack_base_stat).collect::<Vec<_>>(),
        )),
        Arc::new(Int64Array::from(
            rows.iter().map(|r| r.special_defense_base_stat).collect::<Vec<_>>(),
        )),
        Arc::new(Int64Array::from(rows.iter().map(|r| r.speed_base_stat).collect::<Vec<_>>())),
        Arc::new(StringArray::from(rows.iter().map(|r| r.type_1.as_deref()).collect::<Vec<_>>())),
        Arc::new(StringArray::from(rows.iter().map(|r| r.type_2.as_deref()).collect::<Vec<_>>())),
    ];

    Ok(RecordBatch::try_new(schema, columns)?)
}

/// Write the combined table as Snappy-compressed Parquet.
pub fn write_parquet(rows: &[CombinedRow], path: &Path) -> Result<()> {
    let batch = to_record_batch(rows)?;
    let file = File::create(path)?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    info!(phase = "transform", rows = rows.len(), path = %path.display(), "parquet written");
    Ok(())
}

/// Write the combined table as CSV with a header row.
pub fn write_csv(rows: &[CombinedRow], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(phase = "transform", rows = rows.len(), path = %path.display(), "csv written");
    Ok(())
}

/// Read a combined table back from Parquet.
pub fn read_parquet(path: &Path) -> Result<Vec<CombinedRow>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(EtlError::MissingArtifact(path.to_path_buf()));
        },
        Err(err) => return Err(err.into()),
    };

    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch?;

        let species_id = i64_col(&batch, "species_id")?;
        let name = str_col(&batch, "name")?;
        let color = str_col(&batch, "color")?;
        let habitat = str_col(&batch, "habitat")?;
        let generation = str_col(&batch, "generation")?;
        let previous_evolution = str_col(&batch, "previous_evolution")?;
        let is_mythical = bool_col(&batch, "is_mythical")?;
        let is_baby = bool_col(&batch, "is_baby")?;
        let is_legendary = bool_col(&batch, "is_legendary")?;
        let nat_pokedex_entry = i64_col(&batch, "nat_pokedex_entry")?;
        let pokemon_id = i64_col(&batch, "pokemon_id")?;
        let hp = i64_col(&batch, "hp_base_stat")?;
        let attack = i64_col(&batch, "attack_base_stat")?;
        let defense = i64_col(&batch, "defense_base_stat")?;
        let special_attack = i64_col(&batch, "special_attack_base_stat")?;
        let special_defense = i64_col(&batch, "special_defense_base_stat")?;
        let speed = i64_col(&batch, "speed_base_stat")?;
        let type_1 = str_col(&batch, "type_1")?;
        let type_2 = str_col(&batch, "type_2")?;

        for i in 0..batch.num_rows() {
            rows.push(CombinedRow {
                species_id: species_id.value(i),
                name: name.value(i).to_string(),
                color: color.value(i).to_string(),
                habitat: opt_str(habitat, i),
                generation: generation.value(i).to_string(),
                previous_evolution: opt_str(previous_evolution, i),
                is_mythical: is_mythical.value(i),
                is_baby: is_baby.value(i),
                is_legendary: is_legendary.value(i),
                nat_pokedex_entry: opt_i64(nat_pokedex_entry, i),
                pokemon_id: opt_i64(pokemon_id, i),
                hp_base_stat: opt_i64(hp, i),
                attack_base_stat: opt_i64(attack, i),
                defense_base_stat: opt_i64(defense, i),
                special_attack_base_stat: opt_i64(special_attack, i),
                special_defense_base_stat: opt_i64(special_defense, i),
                speed_base_stat: opt_i64(speed, i),
                type_1: opt_str(type_1, i),
                type_2: opt_str(type_2, i),
            });
        }
    }

    info!(phase = "load", rows = rows.len(), path = %path.display(), "parquet read");
    Ok(rows)
}

fn i64_col<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Int64Array> {
    batch
        .column_by_name(name)
        .and_then(|col| col.as_any().downcast_ref::<Int64Array>())
        .ok_or_else(|| EtlError::Columnar(format!("missing or mistyped column: {name}")))
}

fn str_col<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .and_then(|col| col.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| EtlError::Columnar(format!("missing or mistyped column: {name}")))
}

fn bool_col<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a BooleanArray> {
    batch
        .column_by_name(name)
        .and_then(|col| col.as_any().downcast_ref::<BooleanArray>())
        .ok_or_else(|| EtlError::Columnar(format!("missing or mistyped column: {name}")))
}

fn opt_str(array: &StringArray, index: usize) -> Option<String> {
    if array.is_null(index) {
        None
    } else {
        Some(array.value(index).to_string())
    }
}

fn opt_i64(array: &Int64Array, index: usize) -> Option<i64> {
    if array.is_null(index) {
        None
    } else {
        Some(array.value(index))
    }
}
