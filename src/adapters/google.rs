use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::adapters::{candidate, ensure_success};
use crate::domain::model::Candidate;
use crate::domain::ports::SearchGateway;
use crate::utils::error::Result;

/// The Custom Search JSON API returns at most ten items per request.
const MAX_PAGE_SIZE: usize = 10;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

pub struct GoogleCseGateway {
    client: Client,
    base_url: String,
    api_key: String,
    engine_id: String,
}

impl GoogleCseGateway {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        engine_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            engine_id: engine_id.into(),
        }
    }
}

#[async_trait]
impl SearchGateway for GoogleCseGateway {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Candidate>> {
        let url = format!("{}/customsearch/v1", self.base_url);
        let num = max_results.clamp(1, MAX_PAGE_SIZE).to_string();
        debug!(%url, query, "Google CSE search");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await?;
        let payload: SearchResponse = ensure_success(self.name(), response).await?.json().await?;

        Ok(payload
            .items
            .into_iter()
            .filter_map(|item| {
                candidate(
                    item.title.trim().to_string(),
                    item.link.trim().to_string(),
                    item.snippet.split_whitespace().collect::<Vec<_>>().join(" "),
                    query,
                )
            })
            .take(max_results)
            .collect())
    }

    fn name(&self) -> &str {
        "google"
    }
}
