//! Index listing for the two upstream collections

use crate::client::ApiClient;
use crate::error::Result;
use serde::Deserialize;
use tracing::{info, warn};

/// Lightweight pointer to a detail record, obtained from an index listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EntityRef {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct GenerationIndex {
    results: Vec<EntityRef>,
}

/// The pokemon index only guarantees a `url` per entry.
#[derive(Debug, Deserialize)]
struct UrlEntry {
    url: String,
}

#[derive(Debug, Deserialize)]
struct PokemonIndex {
    #[serde(default)]
    count: Option<u64>,
    results: Vec<UrlEntry>,
}

/// Fetch the generation index and keep the entries named in `wanted`,
/// preserving the API's relative ordering among matches. Names absent from
/// the upstream index are dropped with a warning.
pub async fn list_generations(
    client: &ApiClient,
    base_url: &str,
    wanted: &[String],
) -> Result<Vec<EntityRef>> {
    let url = format!("{base_url}generation/");
    info!(phase = "extract", url = %url, "listing generations");

    let index: GenerationIndex = serde_json::from_value(client.fetch_json(&url).await?)?;

    let found: Vec<EntityRef> = index
        .results
        .into_iter()
        .filter(|entry| wanted.iter().any(|name| name == &entry.name))
        .collect();

    for name in wanted {
        if !found.iter().any(|entry| &entry.name == name) {
            warn!(
                phase = "extract",
                generation = %name,
                "requested generation not present upstream, skipping"
            );
        }
    }

    Ok(found)
}

/// Fetch one page of the pokemon index and return the detail URLs.
///
/// The limit is sized to cover the full known catalog in a single call; when
/// the index reports more entries than the limit, the truncation is warned
/// about rather than paginated.
pub async fn list_pokemon_urls(
    client: &ApiClient,
    base_url: &str,
    limit: usize,
) -> Result<Vec<String>> {
    let url = format!("{base_url}pokemon?limit={limit}");
    info!(phase = "extract", url = %url, "listing pokemon");

    let index: PokemonIndex = serde_json::from_value(client.fetch_json(&url).await?)?;

    if let Some(count) = index.count {
        if count as usize > limit {
            warn!(
                phase = "extract",
                count,
                limit,
                "pokemon index exceeds the page limit, listing truncated"
            );
        }
    }

    Ok(index.results.into_iter().map(|entry| entry.url).collect())
}
