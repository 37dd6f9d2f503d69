//! HTTP client for the upstream API
//!
//! One `reqwest::Client` is built per extraction run and reused across all
//! concurrent fetches; connection pooling lives inside the client.

use crate::error::{EtlError, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::error;

/// Shared API client wrapping a single HTTP session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    /// Create a new client with the given request timeout.
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("pokedata-etl/0.1")
            .build()?;

        Ok(ApiClient { client })
    }

    /// Fetch a URL and decode the JSON body.
    ///
    /// Any non-2xx status fails with [`EtlError::RemoteFetch`] carrying the
    /// status and URL; the caller decides whether to abort or skip. No retry
    /// happens at this layer.
    pub async fn fetch_json(&self, url: &str) -> Result<Value> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            error!(phase = "extract", url, status = status.as_u16(), "request failed");
            return Err(EtlError::RemoteFetch {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_json_decodes_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/thing"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 7})))
            .mount(&server)
            .await;

        let client = ApiClient::new(5).unwrap();
        let value = client.fetch_json(&format!("{}/thing", server.uri())).await.unwrap();
        assert_eq!(value["id"], 7);
    }

    #[tokio::test]
    async fn test_fetch_json_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = ApiClient::new(5).unwrap();
        let url = format!("{}/missing", server.uri());
        let err = client.fetch_json(&url).await.unwrap_err();
        match err {
            EtlError::RemoteFetch { status, url: failed } => {
                assert_eq!(status, 404);
                assert_eq!(failed, url);
            },
            other => panic!("expected RemoteFetch, got {other:?}"),
        }
    }
}
