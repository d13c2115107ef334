//! Roster loading: plain name lists and faculty directory pages.

use std::collections::BTreeSet;

use reqwest::Client;
use scraper::Html;
use tracing::{info, warn};

use crate::adapters::{build_http_client, element_text, ensure_success, selector};
use crate::config::cli::LocalStorage;
use crate::config::settings::EngineSettings;
use crate::domain::model::Roster;
use crate::domain::ports::Storage;
use crate::utils::error::{Result, ScanError};

const ACADEMIC_TITLES: [&str; 9] = [
    "professor",
    "lecturer",
    "instructor",
    "fellow",
    "dean",
    "chair",
    "director",
    "researcher",
    "scholar",
];

const INSTITUTION_WORDS: [&str; 8] = [
    "university",
    "college",
    "department",
    "school",
    "institute",
    "center",
    "centre",
    "program",
];

const NAVIGATION_WORDS: [&str; 6] = ["NEWS", "UPDATE", "ALERT", "CLICK", "VIEW", "READ"];

const NAME_PREFIXES: [&str; 5] = ["Professor ", "Prof. ", "Prof ", "Dr. ", "Dr "];

/// One name per line; blank lines and `#` comments are skipped.
pub fn parse_roster_text(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub async fn load_roster_file<S: Storage>(storage: &S, path: &str) -> Result<Vec<String>> {
    let bytes = storage.read_file(path).await?;
    let text = String::from_utf8(bytes).map_err(|e| ScanError::ValidationError {
        message: format!("roster file {} is not UTF-8: {}", path, e),
    })?;
    let names = parse_roster_text(&text);
    info!(path, names = names.len(), "Loaded roster file");
    Ok(names)
}

pub async fn fetch_roster(client: &Client, url: &str) -> Result<Vec<String>> {
    let response = client.get(url).send().await?;
    let body = ensure_success("directory", response).await?.text().await?;
    let names = extract_roster_from_html(&body)?;
    if names.is_empty() {
        warn!(url, "No names recognised on directory page");
    } else {
        info!(url, names = names.len(), "Extracted roster from directory page");
    }
    Ok(names)
}

/// Concatenates inline names, the roster file and the directory page, then
/// de-duplicates. An unreachable directory page contributes no names, and an
/// empty roster still yields a run with the placeholder report.
pub async fn resolve_roster(
    names: &[String],
    path: Option<&str>,
    url: Option<&str>,
    engine: &EngineSettings,
) -> Result<Roster> {
    let mut all: Vec<String> = names.to_vec();
    if let Some(path) = path {
        all.extend(load_roster_file(&LocalStorage::new(".".to_string()), path).await?);
    }
    if let Some(url) = url {
        let client = build_http_client(engine)?;
        match fetch_roster(&client, url).await {
            Ok(fetched) => all.extend(fetched),
            Err(e) => warn!(url, error = %e, "Directory page unavailable; continuing without it"),
        }
    }

    let roster = Roster::new(all);
    if roster.is_empty() {
        warn!("Roster is empty after loading all sources");
    }
    Ok(roster)
}

/// Pulls likely person names from a faculty directory page, sorted and unique.
pub fn extract_roster_from_html(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let mut names = BTreeSet::new();

    // A name line directly followed by a title line.
    let lines: Vec<String> = document
        .root_element()
        .text()
        .flat_map(|chunk| chunk.split('\n'))
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect();
    for pair in lines.windows(2) {
        if has_academic_title(&pair[1]) {
            let name = strip_prefixes(&pair[0]);
            if looks_like_name(name) {
                names.insert(name.to_string());
            }
        }
    }

    // Emphasised text made only of capitalised words.
    let headings = selector("h3, h4, h5, strong, b")?;
    for element in document.select(&headings) {
        let text = element_text(&element);
        let name = strip_prefixes(&text);
        if all_capitalised(name) && looks_like_name(name) {
            names.insert(name.to_string());
        }
    }

    Ok(names.into_iter().collect())
}

fn has_academic_title(line: &str) -> bool {
    let lower = line.to_lowercase();
    ACADEMIC_TITLES.iter().any(|t| lower.contains(t))
}

fn strip_prefixes(text: &str) -> &str {
    let text = text.trim();
    NAME_PREFIXES
        .iter()
        .find_map(|prefix| text.strip_prefix(prefix))
        .unwrap_or(text)
        .trim()
}

fn looks_like_name(text: &str) -> bool {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() < 2 || text.chars().count() >= 50 {
        return false;
    }
    if text.chars().any(|c| c.is_ascii_digit() || c == '@' || c == '|') {
        return false;
    }
    let lower = text.to_lowercase();
    if INSTITUTION_WORDS.iter().any(|w| lower.contains(w)) || has_academic_title(text) {
        return false;
    }
    !words.iter().any(|w| {
        let upper = w.trim_matches(|c: char| !c.is_alphanumeric()).to_uppercase();
        NAVIGATION_WORDS.contains(&upper.as_str())
    })
}

fn all_capitalised(text: &str) -> bool {
    text.split_whitespace()
        .all(|w| w.chars().next().is_some_and(char::is_uppercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roster_text() {
        let text = "# faculty\nJuan Cole\n\n  Noura Erakat  \n# trailing";
        assert_eq!(parse_roster_text(text), vec!["Juan Cole", "Noura Erakat"]);
    }

    #[test]
    fn test_extract_from_directory_page() {
        let html = r#"
            <html><body>
              <nav><b>READ MORE</b><b>Latest News</b></nav>
              <div class="person">
                <p>Dr. Noura Erakat</p>
                <p>Associate Professor of Africana Studies</p>
              </div>
              <div class="person">
                <h4>Adil Haque</h4>
                <span>Rutgers Law School</span>
              </div>
              <div class="person">
                <p>Juan Cole</p>
                <p>Visiting Lecturer</p>
              </div>
              <h3>Department Of History</h3>
              <strong>Click To View Profiles</strong>
              <p>Contact</p>
              <p>Program director</p>
            </body></html>
        "#;
        let names = extract_roster_from_html(html).unwrap();
        assert_eq!(
            names,
            vec!["Adil Haque", "Juan Cole", "Noura Erakat"]
        );
    }

    #[test]
    fn test_looks_like_name_rules() {
        assert!(looks_like_name("Ghada Ageel"));
        assert!(!looks_like_name("Cher"));
        assert!(!looks_like_name("Click Here"));
        assert!(!looks_like_name("Room 204 Smith"));
        assert!(!looks_like_name("Rutgers University Press"));
        assert!(!looks_like_name(&"Very Long Name ".repeat(5)));
    }

    #[test]
    fn test_strip_prefixes() {
        assert_eq!(strip_prefixes("Prof. Juan Cole"), "Juan Cole");
        assert_eq!(strip_prefixes("Professor Noura Erakat"), "Noura Erakat");
        assert_eq!(strip_prefixes("Drew Smith"), "Drew Smith");
    }
}
