//! PostgreSQL full-replace loader
//!
//! The destination table is dropped and recreated inside one transaction,
//! then filled with chunked multi-row inserts; a failed load leaves the
//! previous table intact because nothing commits.

use crate::config::DatabaseConfig;
use crate::error::Result;
use pokedata_common::CombinedRow;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;

/// Rows per INSERT statement. 19 columns per row keeps this comfortably
/// under the PostgreSQL bind-parameter limit.
pub const INSERT_CHUNK_SIZE: usize = 500;

const COLUMNS: [&str; 19] = [
    "species_id",
    "name",
    "color",
    "habitat",
    "generation",
    "previous_evolution",
    "is_mythical",
    "is_baby",
    "is_legendary",
    "nat_pokedex_entry",
    "pokemon_id",
    "hp_base_stat",
    "attack_base_stat",
    "defense_base_stat",
    "special_attack_base_stat",
    "special_defense_base_stat",
    "speed_base_stat",
    "type_1",
    "type_2",
];

/// Connect to the destination database and probe the connection.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool> {
    info!(phase = "load", "connecting to PostgreSQL");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;

    sqlx::query("SELECT 1").execute(&pool).await?;
    info!(phase = "load", "database connection established");

    Ok(pool)
}

fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE {table} (
            species_id BIGINT NOT NULL,
            name TEXT NOT NULL,
            color TEXT NOT NULL,
            habitat TEXT,
            generation TEXT NOT NULL,
            previous_evolution TEXT,
            is_mythical BOOLEAN NOT NULL,
            is_baby BOOLEAN NOT NULL,
            is_legendary BOOLEAN NOT NULL,
            nat_pokedex_entry BIGINT,
            pokemon_id BIGINT,
            hp_base_stat BIGINT,
            attack_base_stat BIGINT,
            defense_base_stat BIGINT,
            special_attack_base_stat BIGINT,
            special_defense_base_stat BIGINT,
            speed_base_stat BIGINT,
            type_1 TEXT,
            type_2 TEXT
        )"
    )
}

/// Replace the destination table with the given rows. Returns the number of
/// rows loaded. The table name has been validated against an identifier
/// charset at configuration time.
pub async fn load_full_replace(pool: &PgPool, table: &str, rows: &[CombinedRow]) -> Result<u64> {
    let mut tx = pool.begin().await?;

    sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
        .execute(&mut *tx)
        .await?;
    sqlx::query(&create_table_sql(table)).execute(&mut *tx).await?;

    for chunk in rows.chunks(INSERT_CHUNK_SIZE) {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("INSERT INTO {table} ({}) ", COLUMNS.join(", ")));

        builder.push_values(chunk, |mut b, row| {
            b.push_bind(row.species_id)
                .push_bind(&row.name)
                .push_bind(&row.color)
                .push_bind(&row.habitat)
                .push_bind(&row.generation)
                .push_bind(&row.previous_evolution)
                .push_bind(row.is_mythical)
                .push_bind(row.is_baby)
                .push_bind(row.is_legendary)
                .push_bind(row.nat_pokedex_entry)
                .push_bind(row.pokemon_id)
                .push_bind(row.hp_base_stat)
                .push_bind(row.attack_base_stat)
                .push_bind(row.defense_base_stat)
                .push_bind(row.special_attack_base_stat)
                .push_bind(row.special_defense_base_stat)
                .push_bind(row.speed_base_stat)
                .push_bind(&row.type_1)
                .push_bind(&row.type_2);
        });

        builder.build().execute(&mut *tx).await?;
    }

    tx.commit().await?;

    info!(phase = "load", rows = rows.len(), table, "full-replace load committed");
    Ok(rows.len() as u64)
}
