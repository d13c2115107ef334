use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use tracing::debug;

use crate::adapters::{candidate, element_text, ensure_success, selector};
use crate::domain::model::Candidate;
use crate::domain::ports::SearchGateway;
use crate::utils::error::Result;

/// Scrapes the Bing HTML results page.
pub struct BingGateway {
    client: Client,
    base_url: String,
}

impl BingGateway {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SearchGateway for BingGateway {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Candidate>> {
        let url = format!("{}/search", self.base_url);
        debug!(%url, query, "Bing search");

        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("count", &max_results.to_string())])
            .send()
            .await?;
        let body = ensure_success(self.name(), response).await?.text().await?;

        parse_results(&body, query, max_results)
    }

    fn name(&self) -> &str {
        "bing"
    }
}

/// `li.b_algo` blocks: `h2 a` for title and link, first `p` for the snippet.
pub fn parse_results(html: &str, query: &str, max_results: usize) -> Result<Vec<Candidate>> {
    let document = Html::parse_document(html);
    let result_sel = selector("li.b_algo")?;
    let link_sel = selector("h2 a")?;
    let snippet_sel = selector("p")?;

    Ok(document
        .select(&result_sel)
        .filter_map(|block| {
            let link = block.select(&link_sel).next()?;
            let url = link.value().attr("href")?.trim().to_string();
            let title = element_text(&link);
            let snippet = block
                .select(&snippet_sel)
                .next()
                .map(|p| element_text(&p))
                .unwrap_or_default();
            candidate(title, url, snippet, query)
        })
        .take(max_results)
        .collect())
}
