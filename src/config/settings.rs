use crate::domain::model::{ReportPeriod, SourceMode};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_date_order, validate_non_empty_string, validate_positive_number,
    validate_query_templates, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_QUERY_TEMPLATES: [&str; 5] = [
    "\"{name}\" (op-ed OR opinion OR commentary) 2025",
    "\"{name}\" interview 2025",
    "\"{name}\" Gaza Palestine 2024 2025",
    "\"{name}\" author byline news",
    "\"{name}\" professor quoted",
];

pub const DEFAULT_REPORT_TITLE: &str = "Op-Eds by Faculty Affiliates";

/// A trusted outlet: domain fragment matched against URLs, and its canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub domain: String,
    pub name: String,
}

/// Everything that shapes validation, aggregation and rendering for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    pub period: ReportPeriod,
    pub source_mode: SourceMode,
    pub per_person_cap: usize,
    pub proximity_window: usize,
    pub results_per_query: usize,
    pub query_templates: Vec<String>,
    pub snippet_budget: usize,
    pub date_years: Vec<i32>,
    pub default_date_label: Option<String>,
    pub enforce_period: bool,
    pub report_title: String,
    pub bundle: bool,
    pub trusted_sources: Option<Vec<SourceEntry>>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            period: ReportPeriod::default(),
            source_mode: SourceMode::TrustedOnly,
            per_person_cap: 3,
            proximity_window: 5,
            results_per_query: 2,
            query_templates: DEFAULT_QUERY_TEMPLATES
                .iter()
                .map(|t| t.to_string())
                .collect(),
            snippet_budget: 500,
            date_years: vec![2024, 2025],
            default_date_label: None,
            enforce_period: false,
            report_title: DEFAULT_REPORT_TITLE.to_string(),
            bundle: true,
            trusted_sources: None,
        }
    }
}

impl ScanSettings {
    /// Placeholder for mentions without a recognisable date: explicit label,
    /// else the period's end year, else a fixed marker. Never empty.
    pub fn effective_date_label(&self) -> String {
        if let Some(label) = self
            .default_date_label
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
        {
            return label.to_string();
        }
        match self.period.end {
            Some(end) => chrono::Datelike::year(&end).to_string(),
            None => "period unspecified".to_string(),
        }
    }
}

impl Validate for ScanSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("period.label", &self.period.label)?;
        validate_date_order("period", self.period.start, self.period.end)?;
        validate_range("per_person_cap", self.per_person_cap, 1, 50)?;
        validate_positive_number("proximity_window", self.proximity_window, 1)?;
        validate_range("results_per_query", self.results_per_query, 1, 50)?;
        validate_query_templates("query_templates", &self.query_templates)?;
        validate_positive_number("snippet_budget", self.snippet_budget, 1)?;
        if self.date_years.is_empty() {
            return Err(crate::utils::error::ScanError::InvalidConfigValueError {
                field: "date_years".to_string(),
                value: String::new(),
                reason: "At least one year is required".to_string(),
            });
        }
        if let Some(sources) = &self.trusted_sources {
            for source in sources {
                validate_non_empty_string("trusted_sources.domain", &source.domain)?;
                validate_non_empty_string("trusted_sources.name", &source.name)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngineKind {
    #[default]
    Bing,
    DuckDuckGo,
    Google,
}

impl SearchEngineKind {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            SearchEngineKind::Bing => "https://www.bing.com",
            SearchEngineKind::DuckDuckGo => "https://html.duckduckgo.com",
            SearchEngineKind::Google => "https://www.googleapis.com",
        }
    }
}

impl std::str::FromStr for SearchEngineKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bing" => Ok(SearchEngineKind::Bing),
            "duckduckgo" | "ddg" => Ok(SearchEngineKind::DuckDuckGo),
            "google" => Ok(SearchEngineKind::Google),
            other => Err(format!("unknown search engine '{}'", other)),
        }
    }
}

/// Search boundary settings: which engine, and how politely to call it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub engine: SearchEngineKind,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub engine_id: Option<String>,
    pub timeout_seconds: u64,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub max_concurrent_queries: usize,
    pub user_agent: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            engine: SearchEngineKind::Bing,
            base_url: None,
            api_key: None,
            engine_id: None,
            timeout_seconds: 15,
            min_delay_ms: 2000,
            max_delay_ms: 4000,
            max_concurrent_queries: 2,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        }
    }
}

impl EngineSettings {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.engine.default_base_url())
    }

    pub fn politeness(&self) -> PolitenessPolicy {
        PolitenessPolicy {
            max_concurrent: self.max_concurrent_queries.max(1),
            min_delay: Duration::from_millis(self.min_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms.max(self.min_delay_ms)),
            timeout: Duration::from_secs(self.timeout_seconds),
        }
    }
}

impl Validate for EngineSettings {
    fn validate(&self) -> Result<()> {
        validate_url("engine.base_url", self.base_url())?;
        validate_range("engine.timeout_seconds", self.timeout_seconds, 1, 300)?;
        validate_positive_number("engine.max_concurrent_queries", self.max_concurrent_queries, 1)?;
        if self.min_delay_ms > self.max_delay_ms {
            return Err(crate::utils::error::ScanError::InvalidConfigValueError {
                field: "engine.min_delay_ms".to_string(),
                value: self.min_delay_ms.to_string(),
                reason: format!("Must not exceed max_delay_ms ({})", self.max_delay_ms),
            });
        }
        if self.engine == SearchEngineKind::Google {
            crate::utils::validation::validate_required_field("engine.api_key", &self.api_key)?;
            crate::utils::validation::validate_required_field("engine.engine_id", &self.engine_id)?;
        }
        Ok(())
    }
}

/// Delay distribution plus concurrency cap applied at the search boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolitenessPolicy {
    pub max_concurrent: usize,
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub timeout: Duration,
}

impl PolitenessPolicy {
    /// No delays; for tests and local mock engines.
    pub fn immediate(timeout: Duration) -> Self {
        Self {
            max_concurrent: 4,
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_default_settings_validate() {
        assert!(ScanSettings::default().validate().is_ok());
        assert!(EngineSettings::default().validate().is_ok());
    }

    #[test]
    fn test_effective_date_label_fallbacks() {
        let mut settings = ScanSettings::default();
        assert_eq!(settings.effective_date_label(), "period unspecified");

        settings.period.end = NaiveDate::from_ymd_opt(2025, 7, 31);
        assert_eq!(settings.effective_date_label(), "2025");

        settings.default_date_label = Some("Summer 2025".to_string());
        assert_eq!(settings.effective_date_label(), "Summer 2025");

        settings.default_date_label = Some("   ".to_string());
        assert_eq!(settings.effective_date_label(), "2025");
    }

    #[test]
    fn test_google_requires_credentials() {
        let engine = EngineSettings {
            engine: SearchEngineKind::Google,
            ..EngineSettings::default()
        };
        assert!(engine.validate().is_err());

        let engine = EngineSettings {
            engine: SearchEngineKind::Google,
            api_key: Some("key".to_string()),
            engine_id: Some("cx".to_string()),
            ..EngineSettings::default()
        };
        assert!(engine.validate().is_ok());
    }

    #[test]
    fn test_politeness_clamps_inverted_delays() {
        let engine = EngineSettings {
            min_delay_ms: 500,
            max_delay_ms: 100,
            max_concurrent_queries: 0,
            ..EngineSettings::default()
        };
        let policy = engine.politeness();
        assert_eq!(policy.max_concurrent, 1);
        assert_eq!(policy.max_delay, Duration::from_millis(500));
    }
}
