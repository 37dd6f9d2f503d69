//! Per-generation species retrieval

use crate::client::ApiClient;
use crate::error::Result;
use crate::extract::EntityRef;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Deserialize)]
struct GenerationManifest {
    pokemon_species: Vec<EntityRef>,
}

/// Fetches each generation's manifest, then every referenced species detail,
/// and persists one artifact per generation named after it.
///
/// Species details are fetched strictly sequentially; the record count per
/// generation is small. Any fetch failure aborts the generation and discards
/// the details already fetched for it.
pub struct GenerationRetriever<'a> {
    client: &'a ApiClient,
    out_dir: PathBuf,
}

impl<'a> GenerationRetriever<'a> {
    pub fn new(client: &'a ApiClient, out_dir: impl Into<PathBuf>) -> Self {
        GenerationRetriever {
            client,
            out_dir: out_dir.into(),
        }
    }

    /// Fetch and persist every generation in `generations`.
    pub async fn fetch_all(&self, generations: &[EntityRef]) -> Result<()> {
        for generation in generations {
            info!(
                phase = "extract",
                generation = %generation.name,
                url = %generation.url,
                "downloading generation"
            );

            let manifest: GenerationManifest =
                serde_json::from_value(self.client.fetch_json(&generation.url).await?)?;

            let mut records = Vec::with_capacity(manifest.pokemon_species.len());
            for species in &manifest.pokemon_species {
                records.push(self.client.fetch_json(&species.url).await?);
            }

            let path = self.out_dir.join(format!("{}.json", generation.name));
            super::write_artifact(&path, &records)?;
            info!(
                phase = "extract",
                generation = %generation.name,
                count = records.len(),
                "generation persisted"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_generation_artifact_contains_all_species() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/generation/1/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "generation-i",
                "pokemon_species": [
                    {"name": "bulbasaur", "url": format!("{}/species/1/", server.uri())},
                    {"name": "ivysaur", "url": format!("{}/species/2/", server.uri())}
                ]
            })))
            .mount(&server)
            .await;
        for id in 1..=2 {
            Mock::given(method("GET"))
                .and(path(format!("/species/{id}/")))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": id})))
                .mount(&server)
                .await;
        }

        let dir = tempfile::tempdir().unwrap();
        let client = ApiClient::new(5).unwrap();
        let generations = vec![EntityRef {
            name: "generation-i".to_string(),
            url: format!("{}/generation/1/", server.uri()),
        }];

        GenerationRetriever::new(&client, dir.path())
            .fetch_all(&generations)
            .await
            .unwrap();

        let raw = std::fs::read_to_string(dir.path().join("generation-i.json")).unwrap();
        let records: Vec<Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["id"], 1);
        assert_eq!(records[1]["id"], 2);
    }

    #[tokio::test]
    async fn test_failed_species_fetch_discards_generation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/generation/1/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "pokemon_species": [
                    {"name": "bulbasaur", "url": format!("{}/species/1/", server.uri())},
                    {"name": "ivysaur", "url": format!("{}/species/2/", server.uri())}
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/species/1/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/species/2/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = ApiClient::new(5).unwrap();
        let generations = vec![EntityRef {
            name: "generation-i".to_string(),
            url: format!("{}/generation/1/", server.uri()),
        }];

        let result = GenerationRetriever::new(&client, dir.path())
            .fetch_all(&generations)
            .await;

        assert!(result.is_err());
        assert!(!dir.path().join("generation-i.json").exists());
    }
}
