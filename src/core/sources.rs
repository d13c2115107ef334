//! Trusted-outlet lookup.
//!
//! Domains are tested in declaration order as case-insensitive substrings of
//! the whole URL, first match wins. Order matters where one domain contains
//! another (`nytimes.com` must come before `time.com`).

use crate::config::settings::SourceEntry;
use url::Url;

const DEFAULT_TRUSTED_SOURCES: [(&str, &str); 29] = [
    ("nytimes.com", "New York Times"),
    ("washingtonpost.com", "Washington Post"),
    ("cnn.com", "CNN"),
    ("aljazeera.com", "Al Jazeera"),
    ("bbc.com", "BBC"),
    ("npr.org", "NPR"),
    ("reuters.com", "Reuters"),
    ("politico.com", "Politico"),
    ("theatlantic.com", "The Atlantic"),
    ("theguardian.com", "The Guardian"),
    ("huffpost.com", "HuffPost"),
    ("slate.com", "Slate"),
    ("vox.com", "Vox"),
    ("axios.com", "Axios"),
    ("apnews.com", "Associated Press"),
    ("abcnews.go.com", "ABC News"),
    ("cbsnews.com", "CBS News"),
    ("nbcnews.com", "NBC News"),
    ("foxnews.com", "Fox News"),
    ("usatoday.com", "USA Today"),
    ("wsj.com", "Wall Street Journal"),
    ("newyorker.com", "The New Yorker"),
    ("time.com", "Time"),
    ("newsweek.com", "Newsweek"),
    ("thehill.com", "The Hill"),
    ("pbs.org", "PBS"),
    ("economist.com", "The Economist"),
    ("ft.com", "Financial Times"),
    ("nypost.com", "New York Post"),
];

pub const UNKNOWN_SOURCE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMatch {
    pub is_trusted: bool,
    pub canonical_name: String,
}

#[derive(Debug, Clone)]
pub struct SourceRegistry {
    entries: Vec<SourceEntry>,
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new(
            DEFAULT_TRUSTED_SOURCES
                .iter()
                .map(|(domain, name)| SourceEntry {
                    domain: domain.to_string(),
                    name: name.to_string(),
                })
                .collect(),
        )
    }
}

impl SourceRegistry {
    pub fn new(entries: Vec<SourceEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|e| SourceEntry {
                domain: e.domain.trim().to_lowercase(),
                name: e.name.trim().to_string(),
            })
            .filter(|e| !e.domain.is_empty())
            .collect();
        Self { entries }
    }

    pub fn from_override(entries: Option<&[SourceEntry]>) -> Self {
        match entries {
            Some(entries) => Self::new(entries.to_vec()),
            None => Self::default(),
        }
    }

    pub fn lookup(&self, url: &str) -> SourceMatch {
        let url_lower = url.to_lowercase();
        if let Some(entry) = self
            .entries
            .iter()
            .find(|entry| url_lower.contains(&entry.domain))
        {
            return SourceMatch {
                is_trusted: true,
                canonical_name: entry.name.clone(),
            };
        }

        SourceMatch {
            is_trusted: false,
            canonical_name: derive_label(url).unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
        }
    }

    /// True when `name` is one of the canonical outlet names.
    pub fn is_canonical_name(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `https://www.randomblog.net/post` -> `Randomblog`.
fn derive_label(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    let kept = match labels.len() {
        0 => return None,
        1 => labels.as_slice(),
        n => &labels[..n - 1],
    };
    let label = title_case(&kept.join("."));
    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}

/// Upper-cases the first letter of every alphabetic run.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trusted_lookup() {
        let registry = SourceRegistry::default();
        let hit = registry.lookup("https://www.nytimes.com/2025/01/01/opinion/x.html");
        assert_eq!(
            hit,
            SourceMatch {
                is_trusted: true,
                canonical_name: "New York Times".to_string()
            }
        );
    }

    #[test]
    fn test_untrusted_lookup_derives_label() {
        let registry = SourceRegistry::default();
        let miss = registry.lookup("https://randomblog.net/post");
        assert!(!miss.is_trusted);
        assert_eq!(miss.canonical_name, "Randomblog");

        let miss = registry.lookup("https://www.middleeasteye.net/opinion/abc");
        assert_eq!(miss.canonical_name, "Middleeasteye");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = SourceRegistry::default();
        assert_eq!(
            registry.lookup("HTTPS://WWW.ALJAZEERA.COM/opinions/1").canonical_name,
            "Al Jazeera"
        );
    }

    #[test]
    fn test_declaration_order_breaks_substring_ties() {
        let registry = SourceRegistry::default();
        assert_eq!(
            registry.lookup("https://www.nytimes.com/a").canonical_name,
            "New York Times"
        );
        assert_eq!(registry.lookup("https://time.com/a").canonical_name, "Time");
    }

    #[test]
    fn test_malformed_url_is_unknown() {
        let registry = SourceRegistry::default();
        let miss = registry.lookup("not a url");
        assert!(!miss.is_trusted);
        assert_eq!(miss.canonical_name, UNKNOWN_SOURCE);
    }

    #[test]
    fn test_override_replaces_defaults() {
        let registry = SourceRegistry::new(vec![SourceEntry {
            domain: " MondoWeiss.net ".to_string(),
            name: "Mondoweiss".to_string(),
        }]);
        assert_eq!(registry.len(), 1);
        assert!(registry.lookup("https://mondoweiss.net/2025/06/x").is_trusted);
        assert!(!registry.lookup("https://www.nytimes.com/x").is_trusted);
        assert!(registry.is_canonical_name("Mondoweiss"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("news.example"), "News.Example");
        assert_eq!(title_case("democracy-now"), "Democracy-Now");
    }
}
