use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Search engine '{engine}' failed: {message}")]
    SearchError { engine: String, message: String },

    #[error("{operation} timed out after {seconds}s")]
    Timeout { operation: String, seconds: u64 },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    DataFormat,
    FileSystem,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScanError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScanError::HttpError(_) | ScanError::SearchError { .. } | ScanError::Timeout { .. } => {
                ErrorCategory::Network
            }
            ScanError::ConfigError { .. }
            | ScanError::ConfigValidationError { .. }
            | ScanError::InvalidConfigValueError { .. }
            | ScanError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ScanError::CsvError(_) | ScanError::SerializationError(_) | ScanError::UrlError(_) => {
                ErrorCategory::DataFormat
            }
            ScanError::IoError(_) | ScanError::ZipError(_) => ErrorCategory::FileSystem,
            ScanError::ProcessingError { .. } | ScanError::ValidationError { .. } => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::DataFormat | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::FileSystem => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ScanError::HttpError(_) | ScanError::Timeout { .. } => {
                "Check network connectivity or raise the request timeout, then rerun"
            }
            ScanError::SearchError { .. } => {
                "The search engine may be rate limiting; widen the politeness delay or switch engines"
            }
            ScanError::MissingConfigError { .. } => {
                "Provide the missing value on the command line or in the TOML file"
            }
            ScanError::ConfigError { .. }
            | ScanError::ConfigValidationError { .. }
            | ScanError::InvalidConfigValueError { .. } => {
                "Fix the configuration value named in the message"
            }
            ScanError::IoError(_) | ScanError::ZipError(_) => {
                "Make sure the output directory exists and is writable"
            }
            ScanError::CsvError(_) | ScanError::SerializationError(_) | ScanError::UrlError(_) => {
                "Check that the input file was produced by this tool and is not truncated"
            }
            ScanError::ProcessingError { .. } | ScanError::ValidationError { .. } => {
                "Rerun with --verbose and inspect the log around the failing person"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the search engine: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::DataFormat => format!("Unreadable data: {}", self),
            ErrorCategory::FileSystem => format!("Could not write report files: {}", self),
            ErrorCategory::Processing => format!("Report generation failed: {}", self),
        }
    }

    /// Exit code used by the binaries; warnings still count as success.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
