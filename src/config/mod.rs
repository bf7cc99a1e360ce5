#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::model::RecordPolicy;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_positive_number, validate_url, Validate};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    Http(String),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkSpec {
    Http(String),
    File(PathBuf),
    Stdout,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub source: SourceSpec,
    pub sink: SinkSpec,
    pub record_policy: RecordPolicy,
    pub parallel: bool,
    pub timeout_seconds: Option<u64>,
}

impl RunConfig {
    pub fn new(source: SourceSpec, sink: SinkSpec) -> Self {
        Self {
            source,
            sink,
            record_policy: RecordPolicy::default(),
            parallel: false,
            timeout_seconds: None,
        }
    }
}

impl ConfigProvider for RunConfig {
    fn record_policy(&self) -> RecordPolicy {
        self.record_policy
    }

    fn parallel(&self) -> bool {
        self.parallel
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        match &self.source {
            SourceSpec::Http(endpoint) => validate_url("source.endpoint", endpoint)?,
            SourceSpec::File(path) => validate_path("source.path", &path.to_string_lossy())?,
        }

        match &self.sink {
            SinkSpec::Http(endpoint) => validate_url("sink.endpoint", endpoint)?,
            SinkSpec::File(path) => validate_path("sink.path", &path.to_string_lossy())?,
            SinkSpec::Stdout => {}
        }

        if let Some(timeout) = self.timeout_seconds {
            validate_positive_number("http.timeout_seconds", timeout, 1)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_http_config() {
        let config = RunConfig::new(
            SourceSpec::Http("https://api.example.com/partners".to_string()),
            SinkSpec::Http("https://api.example.com/results".to_string()),
        );

        assert!(config.validate().is_ok());
        assert_eq!(config.record_policy(), RecordPolicy::Strict);
        assert!(!config.parallel());
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_invalid_sink_url_is_rejected() {
        let config = RunConfig::new(
            SourceSpec::File(PathBuf::from("partners.json")),
            SinkSpec::Http("not a url".to_string()),
        );

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut config = RunConfig::new(
            SourceSpec::Http("http://localhost/partners".to_string()),
            SinkSpec::Stdout,
        );
        config.timeout_seconds = Some(0);

        assert!(config.validate().is_err());

        config.timeout_seconds = Some(30);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }
}
