use crate::config::settings::{EngineSettings, ScanSettings};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, ScanError};
use crate::utils::validation::{validate_path, validate_positive_number, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File-based run description for scheduled scans.
///
/// ```toml
/// [run]
/// output_path = "./output"
///
/// [roster]
/// path = "faculty.txt"
///
/// [scan]
/// period = { label = "June 2025 - July 2025", start = "2025-06-01", end = "2025-07-31" }
///
/// [engine]
/// engine = "google"
/// api_key = "${GOOGLE_API_KEY}"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub roster: RosterConfig,
    #[serde(default)]
    pub scan: ScanSettings,
    #[serde(default)]
    pub engine: EngineSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub output_path: String,
    pub concurrent_requests: usize,
    pub monitor: bool,
    pub log_json: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            concurrent_requests: 2,
            monitor: false,
            log_json: false,
        }
    }
}

/// Any combination of sources; names are concatenated in the order
/// inline list, file, directory page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub names: Vec<String>,
    pub path: Option<String>,
    pub url: Option<String>,
}

impl RosterConfig {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.path.is_none() && self.url.is_none()
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ScanError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// `${NAME}` is replaced by the environment variable; unset ones stay literal.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ScanError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.run.monitor
    }
}

impl ConfigProvider for TomlConfig {
    fn output_path(&self) -> &str {
        &self.run.output_path
    }

    fn concurrent_requests(&self) -> usize {
        self.run.concurrent_requests
    }

    fn scan_settings(&self) -> ScanSettings {
        self.scan.clone()
    }

    fn engine_settings(&self) -> EngineSettings {
        self.engine.clone()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_path("run.output_path", &self.run.output_path)?;
        validate_positive_number("run.concurrent_requests", self.run.concurrent_requests, 1)?;

        if self.roster.is_empty() {
            return Err(ScanError::MissingConfigError {
                field: "roster (names, path or url)".to_string(),
            });
        }
        if let Some(path) = &self.roster.path {
            validate_path("roster.path", path)?;
        }
        if let Some(url) = &self.roster.url {
            validate_url("roster.url", url)?;
        }

        self.scan.validate()?;
        self.engine.validate()?;

        if let Some(key) = &self.engine.api_key {
            if key.starts_with("${") {
                return Err(ScanError::InvalidConfigValueError {
                    field: "engine.api_key".to_string(),
                    value: key.clone(),
                    reason: "Environment variable is not set".to_string(),
                });
            }
        }
        Ok(())
    }
}
