pub mod cli;
pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use crate::config::settings::{
        EngineSettings, ScanSettings, SearchEngineKind, DEFAULT_REPORT_TITLE,
    };
    use crate::domain::model::{ReportPeriod, SourceMode};
    use crate::domain::ports::ConfigProvider;
    use crate::utils::error::{Result, ScanError};
    use crate::utils::validation::{
        validate_path, validate_positive_number, validate_url, Validate,
    };
    use chrono::NaiveDate;
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "media-mentions")]
    #[command(about = "Search the web for media mentions of a faculty roster")]
    pub struct CliConfig {
        /// Text file with one name per line
        #[arg(long)]
        pub roster: Option<String>,

        /// Faculty directory page to extract names from
        #[arg(long)]
        pub roster_url: Option<String>,

        /// Extra name to scan (repeatable)
        #[arg(long = "name")]
        pub names: Vec<String>,

        #[arg(long, default_value = "./output")]
        pub output_path: String,

        #[arg(long, default_value = "June 2025 - July 2025")]
        pub period: String,

        #[arg(long)]
        pub start_date: Option<NaiveDate>,

        #[arg(long)]
        pub end_date: Option<NaiveDate>,

        #[arg(long, help = "Drop mentions dated outside the period")]
        pub enforce_period: bool,

        #[arg(long, help = "Placeholder for mentions without a recognisable date")]
        pub date_label: Option<String>,

        #[arg(long, default_value = "bing")]
        pub engine: SearchEngineKind,

        #[arg(long)]
        pub base_url: Option<String>,

        #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
        pub api_key: Option<String>,

        #[arg(long, env = "GOOGLE_CSE_ID")]
        pub engine_id: Option<String>,

        #[arg(long, help = "Keep untrusted outlets under a derived name")]
        pub all_sources: bool,

        #[arg(long, default_value = "3")]
        pub cap: usize,

        #[arg(long, default_value = "5")]
        pub window: usize,

        #[arg(long, default_value = "2")]
        pub results_per_query: usize,

        /// Persons searched at the same time
        #[arg(long, default_value = "2")]
        pub concurrent_requests: usize,

        /// Outbound queries in flight at the same time
        #[arg(long, default_value = "2")]
        pub max_concurrent_queries: usize,

        #[arg(long, default_value = "15")]
        pub timeout_seconds: u64,

        #[arg(long, default_value = "2000")]
        pub min_delay_ms: u64,

        #[arg(long, default_value = "4000")]
        pub max_delay_ms: u64,

        #[arg(long, default_value = DEFAULT_REPORT_TITLE)]
        pub title: String,

        #[arg(long, help = "Skip the zip bundle")]
        pub no_bundle: bool,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log JSON lines instead of text")]
        pub log_json: bool,

        #[arg(long, help = "Log process CPU and memory per phase")]
        pub monitor: bool,
    }

    impl CliConfig {
        pub fn has_roster_source(&self) -> bool {
            self.roster.is_some() || self.roster_url.is_some() || !self.names.is_empty()
        }
    }

    impl ConfigProvider for CliConfig {
        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn concurrent_requests(&self) -> usize {
            self.concurrent_requests
        }

        fn scan_settings(&self) -> ScanSettings {
            ScanSettings {
                period: ReportPeriod::new(self.period.clone())
                    .with_bounds(self.start_date, self.end_date),
                source_mode: if self.all_sources {
                    SourceMode::AllSources
                } else {
                    SourceMode::TrustedOnly
                },
                per_person_cap: self.cap,
                proximity_window: self.window,
                results_per_query: self.results_per_query,
                default_date_label: self.date_label.clone(),
                enforce_period: self.enforce_period,
                report_title: self.title.clone(),
                bundle: !self.no_bundle,
                ..ScanSettings::default()
            }
        }

        fn engine_settings(&self) -> EngineSettings {
            EngineSettings {
                engine: self.engine,
                base_url: self.base_url.clone(),
                api_key: self.api_key.clone(),
                engine_id: self.engine_id.clone(),
                timeout_seconds: self.timeout_seconds,
                min_delay_ms: self.min_delay_ms,
                max_delay_ms: self.max_delay_ms,
                max_concurrent_queries: self.max_concurrent_queries,
                ..EngineSettings::default()
            }
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_path("output_path", &self.output_path)?;
            validate_positive_number("concurrent_requests", self.concurrent_requests, 1)?;
            if !self.has_roster_source() {
                return Err(ScanError::MissingConfigError {
                    field: "roster (--roster, --roster-url or --name)".to_string(),
                });
            }
            if let Some(path) = &self.roster {
                validate_path("roster", path)?;
            }
            if let Some(url) = &self.roster_url {
                validate_url("roster_url", url)?;
            }
            self.scan_settings().validate()?;
            self.engine_settings().validate()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn parse(args: &[&str]) -> CliConfig {
            CliConfig::try_parse_from(std::iter::once("media-mentions").chain(args.iter().copied()))
                .unwrap()
        }

        #[test]
        fn test_defaults_map_to_settings() {
            let config = parse(&["--name", "Juan Cole"]);
            assert!(config.validate().is_ok());

            let scan = config.scan_settings();
            assert_eq!(scan.per_person_cap, 3);
            assert_eq!(scan.proximity_window, 5);
            assert_eq!(scan.source_mode, SourceMode::TrustedOnly);
            assert!(scan.bundle);
            assert_eq!(config.engine_settings().engine, SearchEngineKind::Bing);
        }

        #[test]
        fn test_flags_override_settings() {
            let config = parse(&[
                "--roster",
                "faculty.txt",
                "--all-sources",
                "--cap",
                "5",
                "--start-date",
                "2025-06-01",
                "--end-date",
                "2025-07-31",
                "--engine",
                "ddg",
                "--no-bundle",
            ]);
            let scan = config.scan_settings();
            assert_eq!(scan.source_mode, SourceMode::AllSources);
            assert_eq!(scan.per_person_cap, 5);
            assert_eq!(scan.period.start, NaiveDate::from_ymd_opt(2025, 6, 1));
            assert_eq!(scan.effective_date_label(), "2025");
            assert!(!scan.bundle);
            assert_eq!(config.engine_settings().engine, SearchEngineKind::DuckDuckGo);
        }

        #[test]
        fn test_validation_failures() {
            assert!(parse(&[]).validate().is_err());
            assert!(parse(&["--name", "A B", "--cap", "0"]).validate().is_err());
            assert!(parse(&[
                "--name",
                "A B",
                "--start-date",
                "2025-08-01",
                "--end-date",
                "2025-06-01"
            ])
            .validate()
            .is_err());
            assert!(parse(&["--roster-url", "ftp://x.org/list"]).validate().is_err());
        }
    }
}
