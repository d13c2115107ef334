use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use tracing::debug;

use crate::adapters::{candidate, element_text, ensure_success, selector};
use crate::domain::model::Candidate;
use crate::domain::ports::SearchGateway;
use crate::utils::error::Result;

/// Scrapes the DuckDuckGo no-JS results page.
pub struct DuckDuckGoGateway {
    client: Client,
    base_url: String,
}

impl DuckDuckGoGateway {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SearchGateway for DuckDuckGoGateway {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Candidate>> {
        let url = format!("{}/html/", self.base_url);
        debug!(%url, query, "DuckDuckGo search");

        let response = self.client.get(&url).query(&[("q", query)]).send().await?;
        let body = ensure_success(self.name(), response).await?.text().await?;

        parse_results(&body, query, max_results)
    }

    fn name(&self) -> &str {
        "duckduckgo"
    }
}

pub fn parse_results(html: &str, query: &str, max_results: usize) -> Result<Vec<Candidate>> {
    let document = Html::parse_document(html);
    let result_sel = selector(".result")?;
    let link_sel = selector("a.result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    Ok(document
        .select(&result_sel)
        .filter_map(|block| {
            let link = block.select(&link_sel).next()?;
            let url = unwrap_redirect(link.value().attr("href")?);
            let title = element_text(&link);
            let snippet = block
                .select(&snippet_sel)
                .next()
                .map(|s| element_text(&s))
                .unwrap_or_default();
            candidate(title, url, snippet, query)
        })
        .take(max_results)
        .collect())
}

/// Result links go through `/l/?uddg=<encoded target>&rut=...`.
fn unwrap_redirect(href: &str) -> String {
    let href = href.trim();
    if let Some(start) = href.find("uddg=") {
        let encoded = &href[start + 5..];
        let encoded = encoded.split('&').next().unwrap_or_default();
        if let Ok(decoded) = urlencoding::decode(encoded) {
            return decoded.into_owned();
        }
    }
    match href.strip_prefix("//") {
        Some(rest) => format!("https://{}", rest),
        None => href.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"
        <div class="results">
          <div class="result results_links">
            <h2 class="result__title">
              <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.aljazeera.com%2Fopinions%2F2025%2F7%2F1%2Fx&amp;rut=abc">Noura Erakat on law</a>
            </h2>
            <a class="result__snippet" href="#">An interview with <b>Noura Erakat</b>.</a>
          </div>
          <div class="result results_links">
            <h2 class="result__title"><a class="result__a" href="https://www.npr.org/y">Direct link</a></h2>
          </div>
          <div class="result result--ad"><h2><span>no anchor</span></h2></div>
        </div>
    "##;

    #[test]
    fn test_parse_results_unwraps_redirects() {
        let hits = parse_results(PAGE, "q", 10).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].url, "https://www.aljazeera.com/opinions/2025/7/1/x");
        assert_eq!(hits[0].title, "Noura Erakat on law");
        assert_eq!(hits[0].snippet, "An interview with Noura Erakat.");
        assert_eq!(hits[1].url, "https://www.npr.org/y");
    }

    #[test]
    fn test_unwrap_redirect_variants() {
        assert_eq!(unwrap_redirect("//example.org/a"), "https://example.org/a");
        assert_eq!(unwrap_redirect(" https://x.org "), "https://x.org");
        assert_eq!(
            unwrap_redirect("/l/?uddg=https%3A%2F%2Fcnn.com%2Fz"),
            "https://cnn.com/z"
        );
    }
}
