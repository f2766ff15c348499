//! Google Programmable Search adapter implementing the search seam.
//!
//! Issues Custom Search JSON API requests and maps `items[].link` and
//! `items[].snippet` into ranked hits. A response without `items` means the
//! query matched nothing and yields an empty list, not an error; errors are
//! reserved for transport and non-success HTTP statuses.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use varsity_core::error::{Result, VarsityError};
use varsity_core::model::{SearchHit, SearchProvider};

const BASE_URL: &str = "https://customsearch.googleapis.com/customsearch/v1";

const PROVIDER: &str = "google-search";

/// Search backend over the Google Custom Search JSON API.
#[derive(Clone)]
pub struct GoogleSearchAdapter {
    client: Client,
    api_key: String,
    cse_id: String,
}

impl GoogleSearchAdapter {
    /// Creates a new adapter with the provided API key and search engine id.
    pub fn new(api_key: impl Into<String>, cse_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            cse_id: cse_id.into(),
        }
    }

    async fn perform_search(&self, query: &str, count: u32) -> Result<Vec<SearchHit>> {
        let response = self
            .client
            .get(BASE_URL)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.cse_id.as_str()),
                ("q", query),
                ("num", &count.to_string()),
            ])
            .send()
            .await
            .map_err(|err| {
                VarsityError::backend(PROVIDER, None, format!("request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Google Search error body".to_string());
            return Err(map_http_error(status, body));
        }

        let parsed: SearchResponse = response.json().await.map_err(|err| {
            VarsityError::backend(PROVIDER, None, format!("failed to parse response: {err}"))
        })?;

        Ok(hits_from_response(parsed))
    }
}

#[async_trait]
impl SearchProvider for GoogleSearchAdapter {
    async fn search(&self, query: &str, count: u32) -> Result<Vec<SearchHit>> {
        self.perform_search(query, count).await
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    link: Option<String>,
    snippet: Option<String>,
}

/// Keeps provider order; entries missing a link or snippet are skipped.
fn hits_from_response(response: SearchResponse) -> Vec<SearchHit> {
    response
        .items
        .into_iter()
        .filter_map(|item| {
            Some(SearchHit {
                url: item.link?,
                snippet: item.snippet?,
            })
        })
        .collect()
}

fn map_http_error(status: StatusCode, body: String) -> VarsityError {
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|err| err.get("message"))
                .and_then(|msg| msg.as_str())
                .map(|msg| msg.to_string())
        })
        .unwrap_or(body);

    VarsityError::backend(PROVIDER, Some(status.as_u16()), message)
}
