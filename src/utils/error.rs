use thiserror::Error;

#[derive(Error, Debug)]
pub enum LifeOpsError {
    #[error("Unknown domain: '{domain}' (expected Health, Finance or Study)")]
    UnknownDomain { domain: String },

    #[error("Invalid signal {domain}/{metric}: severity {severity} is outside [0, 1]")]
    InvalidSignal {
        domain: String,
        metric: String,
        severity: f64,
    },

    #[error("Invalid rule #{index}: {reason}")]
    InvalidRule { index: usize, reason: String },

    #[error("Signal collection failed in '{collector}': {details}")]
    CollectionError { collector: String, details: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Collection,
    Network,
    Io,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LifeOpsError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LifeOpsError::UnknownDomain { .. } | LifeOpsError::InvalidSignal { .. } => {
                ErrorCategory::Input
            }
            LifeOpsError::InvalidRule { .. }
            | LifeOpsError::ConfigValidationError { .. }
            | LifeOpsError::InvalidConfigValueError { .. }
            | LifeOpsError::MissingConfigError { .. } => ErrorCategory::Configuration,
            LifeOpsError::CollectionError { .. } => ErrorCategory::Collection,
            LifeOpsError::ApiError(_) => ErrorCategory::Network,
            LifeOpsError::IoError(_) => ErrorCategory::Io,
            LifeOpsError::CsvError(_) | LifeOpsError::SerializationError(_) => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單一訊號被拒絕，其餘訊號仍會評估
            LifeOpsError::InvalidSignal { .. } => ErrorSeverity::Low,
            LifeOpsError::ApiError(_) | LifeOpsError::CollectionError { .. } => {
                ErrorSeverity::Medium
            }
            LifeOpsError::UnknownDomain { .. }
            | LifeOpsError::InvalidRule { .. }
            | LifeOpsError::ConfigValidationError { .. }
            | LifeOpsError::InvalidConfigValueError { .. }
            | LifeOpsError::MissingConfigError { .. }
            | LifeOpsError::CsvError(_)
            | LifeOpsError::SerializationError(_) => ErrorSeverity::High,
            LifeOpsError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            LifeOpsError::UnknownDomain { .. } => {
                "Use one of the recognised domains: Health, Finance, Study"
            }
            LifeOpsError::InvalidSignal { .. } => {
                "Normalize the signal severity into the range 0.0 to 1.0"
            }
            LifeOpsError::InvalidRule { .. } => {
                "Check the rule table: weights must be >= 0 and trigger/target domains must differ"
            }
            LifeOpsError::CollectionError { .. } => {
                "Check the collector source, or set collection.on_failure = \"skip\""
            }
            LifeOpsError::ApiError(_) => "Check the signal endpoint URL and network connectivity",
            LifeOpsError::IoError(_) => "Check that the file exists and the path is writable",
            LifeOpsError::CsvError(_) | LifeOpsError::SerializationError(_) => {
                "Check the report output settings"
            }
            LifeOpsError::ConfigValidationError { .. }
            | LifeOpsError::InvalidConfigValueError { .. }
            | LifeOpsError::MissingConfigError { .. } => {
                "Fix the configuration file and run again (use --dry-run to inspect it)"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Input rejected: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Collection | ErrorCategory::Network => {
                format!("Could not gather signals: {}", self)
            }
            ErrorCategory::Io => format!("File system problem: {}", self),
            ErrorCategory::Data => format!("Could not render the report: {}", self),
        }
    }

    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, LifeOpsError>;
