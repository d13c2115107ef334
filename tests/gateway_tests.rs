use httpmock::prelude::*;
use media_mentions::adapters::roster::{fetch_roster, resolve_roster};
use media_mentions::adapters::{
    build_gateway, build_http_client, BingGateway, DuckDuckGoGateway, GoogleCseGateway,
};
use media_mentions::config::settings::{EngineSettings, SearchEngineKind};
use media_mentions::domain::ports::SearchGateway;
use media_mentions::ScanError;
use std::io::Write;
use tempfile::NamedTempFile;

fn engine(kind: SearchEngineKind, base_url: String) -> EngineSettings {
    EngineSettings {
        engine: kind,
        base_url: Some(base_url),
        min_delay_ms: 0,
        max_delay_ms: 0,
        timeout_seconds: 5,
        ..EngineSettings::default()
    }
}

#[tokio::test]
async fn test_bing_gateway_reports_http_errors() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(429);
    });

    let client = build_http_client(&EngineSettings::default()).unwrap();
    let gateway = BingGateway::new(client, server.base_url());
    let err = gateway.search("Juan Cole", 2).await.unwrap_err();

    mock.assert();
    assert!(matches!(err, ScanError::SearchError { ref engine, .. } if engine == "bing"));
}

#[tokio::test]
async fn test_polite_bing_gateway_degrades_to_empty() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(500);
    });

    let gateway = build_gateway(&engine(SearchEngineKind::Bing, server.base_url())).unwrap();
    assert!(gateway.search("Juan Cole", 2).await.unwrap().is_empty());
    assert_eq!(gateway.name(), "bing");
}

#[tokio::test]
async fn test_duckduckgo_gateway_parses_html() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/html/")
            .query_param("q", "\"Noura Erakat\" interview");
        then.status(200).body(
            r#"<div class="result"><h2><a class="result__a"
                 href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.npr.org%2F2025%2F07%2F01%2Ferakat&rut=1">Noura Erakat speaks</a></h2>
               <a class="result__snippet">July 1, 2025 interview</a></div>
               <div class="result"><h2><a class="result__a" href="https://www.pbs.org/x">Second</a></h2></div>"#,
        );
    });

    let client = build_http_client(&EngineSettings::default()).unwrap();
    let gateway = DuckDuckGoGateway::new(client, server.base_url());
    let hits = gateway.search("\"Noura Erakat\" interview", 1).await.unwrap();

    mock.assert();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].url, "https://www.npr.org/2025/07/01/erakat");
    assert_eq!(hits[0].snippet, "July 1, 2025 interview");
    assert_eq!(hits[0].query_used, "\"Noura Erakat\" interview");
}

#[tokio::test]
async fn test_google_gateway_reads_json_items() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/customsearch/v1")
            .query_param("key", "test-key")
            .query_param("cx", "test-cx")
            .query_param("q", "Adil Haque")
            .query_param("num", "2");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "items": [
                    {"title": "Adil Haque on the laws of war", "link": "https://www.theatlantic.com/a", "snippet": "An  essay\nby Adil Haque"},
                    {"title": "", "link": "https://www.vox.com/b", "snippet": "untitled"},
                    {"title": "Third", "link": "https://www.vox.com/c"}
                ]
            }));
    });

    let client = build_http_client(&EngineSettings::default()).unwrap();
    let gateway = GoogleCseGateway::new(client, server.base_url(), "test-key", "test-cx");
    let hits = gateway.search("Adil Haque", 2).await.unwrap();

    mock.assert();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].snippet, "An essay by Adil Haque");
    assert_eq!(hits[1].url, "https://www.vox.com/c");
    assert_eq!(hits[1].snippet, "");
}

#[tokio::test]
async fn test_google_without_items_is_empty() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/customsearch/v1");
        then.status(200).json_body(serde_json::json!({"kind": "customsearch#search"}));
    });

    let client = build_http_client(&EngineSettings::default()).unwrap();
    let gateway = GoogleCseGateway::new(client, server.base_url(), "k", "cx");
    assert!(gateway.search("Nobody", 5).await.unwrap().is_empty());
}

#[test]
fn test_google_gateway_requires_credentials() {
    let settings = EngineSettings {
        engine: SearchEngineKind::Google,
        ..EngineSettings::default()
    };
    let err = build_gateway(&settings).err().unwrap();
    assert!(matches!(err, ScanError::MissingConfigError { .. }));
}

#[tokio::test]
async fn test_fetch_roster_from_directory_page() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/people");
        then.status(200).body(
            "<html><body>\n<p>Prof. Juan Cole</p>\n<p>Professor of History</p>\n<h4>Noura Erakat</h4>\n</body></html>",
        );
    });

    let client = build_http_client(&EngineSettings::default()).unwrap();
    let names = fetch_roster(&client, &server.url("/people")).await.unwrap();

    mock.assert();
    assert_eq!(names, vec!["Juan Cole", "Noura Erakat"]);
}

#[tokio::test]
async fn test_resolve_roster_merges_sources_and_dedups() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/people");
        then.status(200)
            .body("<h4>Adil Haque</h4><h4>Juan Cole</h4>");
    });

    let mut roster_file = NamedTempFile::new().unwrap();
    roster_file
        .write_all(b"# affiliates\nJuan Cole\nLara Friedman\n")
        .unwrap();
    let path = roster_file.path().to_str().unwrap().to_string();

    let roster = resolve_roster(
        &["Noura Erakat".to_string(), "Juan Cole".to_string()],
        Some(&path),
        Some(&server.url("/people")),
        &EngineSettings::default(),
    )
    .await
    .unwrap();

    let names: Vec<&str> = roster.names().collect();
    assert_eq!(
        names,
        vec!["Noura Erakat", "Juan Cole", "Lara Friedman", "Adil Haque"]
    );
}

#[tokio::test]
async fn test_resolve_roster_allows_empty_result() {
    let roster = resolve_roster(&["   ".to_string()], None, None, &EngineSettings::default())
        .await
        .unwrap();
    assert!(roster.is_empty());
}

#[tokio::test]
async fn test_resolve_roster_survives_unreachable_directory() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/people");
        then.status(503);
    });

    let roster = resolve_roster(
        &["Juan Cole".to_string()],
        None,
        Some(&server.url("/people")),
        &EngineSettings::default(),
    )
    .await
    .unwrap();

    mock.assert();
    let names: Vec<&str> = roster.names().collect();
    assert_eq!(names, vec!["Juan Cole"]);
}
