use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Partner source unavailable at {endpoint}: {message}")]
    SourceUnavailable {
        endpoint: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Malformed partner record #{index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    #[error("Result sink unavailable at {endpoint}: {message}")]
    SinkUnavailable {
        endpoint: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

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

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

pub type Result<T> = std::result::Result<T, EtlError>;

/// The run stage an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Configuration,
    Fetch,
    Validation,
    Aggregation,
    Submission,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStage::Configuration => "configuration",
            RunStage::Fetch => "fetch partners",
            RunStage::Validation => "validate partner records",
            RunStage::Aggregation => "aggregate start dates",
            RunStage::Submission => "submit report",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    System,
}

/// Every severity is fatal for the run; the level only selects the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn stage(&self) -> RunStage {
        match self {
            EtlError::SourceUnavailable { .. } => RunStage::Fetch,
            EtlError::MalformedRecord { .. } => RunStage::Validation,
            EtlError::SinkUnavailable { .. } | EtlError::SerializationError(_) => {
                RunStage::Submission
            }
            EtlError::ProcessingError { .. } => RunStage::Aggregation,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => RunStage::Configuration,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::SourceUnavailable { .. } | EtlError::SinkUnavailable { .. } => {
                ErrorCategory::Network
            }
            EtlError::MalformedRecord { .. } | EtlError::SerializationError(_) => {
                ErrorCategory::Data
            }
            EtlError::ProcessingError { .. } => ErrorCategory::System,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for this error. Never zero.
    pub fn exit_code(&self) -> u8 {
        match self.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::SourceUnavailable { status: Some(code), .. } => format!(
                "The partner endpoint answered with HTTP {}; check the URL and its access key",
                code
            ),
            EtlError::SourceUnavailable { .. } => {
                "Check network connectivity and that the partner endpoint is reachable".to_string()
            }
            EtlError::MalformedRecord { .. } => {
                "Fix the record upstream, or rerun with --policy skip to drop malformed records"
                    .to_string()
            }
            EtlError::SinkUnavailable { status: Some(code), .. } => format!(
                "The result endpoint rejected the report with HTTP {}; the computed report was logged above",
                code
            ),
            EtlError::SinkUnavailable { .. } => {
                "Check that the result endpoint is reachable; the computed report was logged above"
                    .to_string()
            }
            EtlError::SerializationError(_) => {
                "The report could not be encoded as JSON; please report this as a bug".to_string()
            }
            EtlError::ProcessingError { .. } => {
                "Rerun without --parallel to aggregate countries sequentially".to_string()
            }
            EtlError::ConfigError { .. } | EtlError::ConfigValidationError { .. } => {
                "Check the configuration file syntax and values".to_string()
            }
            EtlError::InvalidConfigValueError { field, .. } => {
                format!("Provide a valid value for '{}'", field)
            }
            EtlError::MissingConfigError { field } => {
                format!("Set '{}' in the config file or pass it on the command line", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        format!("Run failed during '{}': {}", self.stage(), self)
    }
}
