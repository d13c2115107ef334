// Adapters: concrete search engines, throttling, roster sources and report encoders.

pub mod bing;
pub mod duckduckgo;
pub mod google;
pub mod politeness;
pub mod roster;
pub mod sinks;

use std::time::Duration;

use reqwest::{Client, Response};
use scraper::{ElementRef, Selector};

use crate::config::settings::{EngineSettings, SearchEngineKind};
use crate::domain::model::Candidate;
use crate::domain::ports::SearchGateway;
use crate::utils::error::{Result, ScanError};

pub use bing::BingGateway;
pub use duckduckgo::DuckDuckGoGateway;
pub use google::GoogleCseGateway;
pub use politeness::PoliteGateway;

pub fn build_http_client(settings: &EngineSettings) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(Duration::from_secs(settings.timeout_seconds))
        .build()?)
}

/// The configured engine wrapped in the politeness policy.
pub fn build_gateway(settings: &EngineSettings) -> Result<Box<dyn SearchGateway>> {
    let client = build_http_client(settings)?;
    let base_url = settings.base_url().to_string();
    let policy = settings.politeness();

    let gateway: Box<dyn SearchGateway> = match settings.engine {
        SearchEngineKind::Bing => Box::new(PoliteGateway::new(BingGateway::new(client, base_url), policy)),
        SearchEngineKind::DuckDuckGo => Box::new(PoliteGateway::new(
            DuckDuckGoGateway::new(client, base_url),
            policy,
        )),
        SearchEngineKind::Google => {
            let api_key = settings
                .api_key
                .clone()
                .ok_or_else(|| ScanError::MissingConfigError {
                    field: "engine.api_key".to_string(),
                })?;
            let engine_id = settings
                .engine_id
                .clone()
                .ok_or_else(|| ScanError::MissingConfigError {
                    field: "engine.engine_id".to_string(),
                })?;
            Box::new(PoliteGateway::new(
                GoogleCseGateway::new(client, base_url, api_key, engine_id),
                policy,
            ))
        }
    };
    Ok(gateway)
}

pub(crate) async fn ensure_success(engine: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(ScanError::SearchError {
        engine: engine.to_string(),
        message: format!("HTTP {} from {}", status, response.url()),
    })
}

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScanError::ProcessingError {
        message: format!("invalid selector '{}': {}", css, e),
    })
}

/// Visible text of an element with whitespace collapsed.
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Hits without a title or URL are parse failures and are dropped.
pub(crate) fn candidate(title: String, url: String, snippet: String, query: &str) -> Option<Candidate> {
    if title.is_empty() || url.is_empty() {
        return None;
    }
    Some(Candidate {
        title,
        url,
        snippet,
        query_used: query.to_string(),
    })
}
