//! End-to-end pipeline tests against a mock upstream API
//!
//! Drives extract and transform over wiremock: a one-generation species
//! index of two species and a pokemon index of two pokemon, where pokemon 1
//! matches species 1, species 2 has no matching pokemon, and pokemon 4
//! matches nothing. The processed outputs must contain exactly the two
//! species rows.

use pokedata_etl::config::{
    ApiConfig, DatabaseConfig, OutputConfig, PathConfig, PipelineConfig,
};
use pokedata_etl::{storage, EtlPipeline};
use serde_json::json;
use std::path::Path;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(base_url: String, data_dir: &Path) -> PipelineConfig {
    PipelineConfig {
        api: ApiConfig {
            base_url,
            generations: vec!["generation-i".to_string()],
            batch_size: 50,
            list_limit: 2000,
            timeout_secs: 5,
        },
        paths: PathConfig {
            raw_pokemon_dir: data_dir.join("raw").join("pokemon"),
            raw_species_dir: data_dir.join("raw").join("species"),
            processed_dir: data_dir.join("processed"),
        },
        database: DatabaseConfig {
            url: "postgresql://localhost/pokedata_test".to_string(),
            max_connections: 1,
            table_name: "pokemons".to_string(),
        },
        output: OutputConfig {
            parquet_name: "pokemons.parquet".to_string(),
            csv_name: "pokemons.csv".to_string(),
        },
    }
}

fn species_record(id: i64, name: &str, evolves_from: Option<&str>) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "color": {"name": "green"},
        "habitat": {"name": "grassland"},
        "generation": {"name": "generation-i"},
        "evolves_from_species": evolves_from.map(|n| json!({"name": n})),
        "is_mythical": false,
        "is_baby": false,
        "is_legendary": false,
        "pokedex_numbers": [
            {"entry_number": id, "pokedex": {"name": "national"}}
        ]
    })
}

fn pokemon_record(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "stats": [
            {"base_stat": 45, "stat": {"name": "hp"}},
            {"base_stat": 49, "stat": {"name": "attack"}},
            {"base_stat": 49, "stat": {"name": "defense"}},
            {"base_stat": 65, "stat": {"name": "special-attack"}},
            {"base_stat": 65, "stat": {"name": "special-defense"}},
            {"base_stat": 45, "stat": {"name": "speed"}}
        ],
        "types": [
            {"slot": 1, "type": {"name": "grass"}},
            {"slot": 2, "type": {"name": "poison"}}
        ]
    })
}

async fn mount_upstream(server: &MockServer) {
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/pokemon"))
        .and(query_param("limit", "2000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "results": [
                {"name": "bulbasaur", "url": format!("{base}/pokemon/1/")},
                {"name": "charmander", "url": format!("{base}/pokemon/4/")}
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pokemon/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pokemon_record(1, "bulbasaur")))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pokemon/4/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pokemon_record(4, "charmander")))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/generation/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"name": "generation-i", "url": format!("{base}/generation/1/")}
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/generation/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "generation-i",
            "pokemon_species": [
                {"name": "bulbasaur", "url": format!("{base}/species/1/")},
                {"name": "ivysaur", "url": format!("{base}/species/2/")}
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/species/1/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(species_record(1, "bulbasaur", None)),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/species/2/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(species_record(2, "ivysaur", Some("bulbasaur"))),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_extract_then_transform_produces_reconciled_outputs() {
    let server = MockServer::start().await;
    mount_upstream(&server).await;

    let data_dir = tempfile::tempdir().unwrap();
    let config = test_config(format!("{}/", server.uri()), data_dir.path());
    let pipeline = EtlPipeline::new(config).unwrap();

    pipeline.run_extract().await.unwrap();

    // staging artifacts exist: one pokemon window, one generation
    assert!(data_dir
        .path()
        .join("raw")
        .join("pokemon")
        .join("pokemon_page_1.json")
        .exists());
    assert!(data_dir
        .path()
        .join("raw")
        .join("species")
        .join("generation-i.json")
        .exists());

    let stats = pipeline.run_transform().unwrap();
    assert_eq!(stats.species_rows, 2);
    assert_eq!(stats.pokemon_rows, 2);
    assert_eq!(stats.combined_rows, 2);

    let rows = storage::read_parquet(
        &data_dir.path().join("processed").join("pokemons.parquet"),
    )
    .unwrap();
    assert_eq!(rows.len(), 2);

    // species 1 matched pokemon 1: fully populated
    let matched = rows.iter().find(|r| r.species_id == 1).unwrap();
    assert_eq!(matched.pokemon_id, Some(1));
    assert_eq!(matched.hp_base_stat, Some(45));
    assert_eq!(matched.type_1.as_deref(), Some("grass"));
    assert_eq!(matched.type_2.as_deref(), Some("poison"));
    assert_eq!(matched.nat_pokedex_entry, Some(1));
    assert_eq!(matched.previous_evolution, None);

    // species 2 has no matching pokemon: creature-derived columns are null
    let unmatched = rows.iter().find(|r| r.species_id == 2).unwrap();
    assert_eq!(unmatched.pokemon_id, None);
    assert_eq!(unmatched.hp_base_stat, None);
    assert_eq!(unmatched.type_1, None);
    assert_eq!(unmatched.previous_evolution.as_deref(), Some("bulbasaur"));

    // pokemon 4 matched no species and is dropped
    assert!(rows.iter().all(|r| r.pokemon_id != Some(4)));

    // the CSV carries the same two rows plus a header
    let csv = std::fs::read_to_string(
        data_dir.path().join("processed").join("pokemons.csv"),
    )
    .unwrap();
    assert_eq!(csv.lines().count(), 3);
}

#[tokio::test]
async fn test_transform_without_pokemon_staging_keeps_species_rows() {
    let server = MockServer::start().await;
    mount_upstream(&server).await;

    let data_dir = tempfile::tempdir().unwrap();
    let config = test_config(format!("{}/", server.uri()), data_dir.path());
    let pipeline = EtlPipeline::new(config).unwrap();

    pipeline.run_extract().await.unwrap();

    // drop the pokemon side of the staging area before transforming
    std::fs::remove_dir_all(data_dir.path().join("raw").join("pokemon")).unwrap();

    let stats = pipeline.run_transform().unwrap();
    assert_eq!(stats.species_rows, 2);
    assert_eq!(stats.pokemon_rows, 0);
    assert_eq!(stats.combined_rows, 2);

    let rows = storage::read_parquet(
        &data_dir.path().join("processed").join("pokemons.parquet"),
    )
    .unwrap();
    assert!(rows.iter().all(|r| r.pokemon_id.is_none()));
}
