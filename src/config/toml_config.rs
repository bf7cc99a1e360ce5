use crate::config::{RunConfig, SinkSpec, SourceSpec};
use crate::domain::model::RecordPolicy;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_required_field, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub sink: SinkConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Exactly one of `endpoint` and `path` may be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub endpoint: Option<String>,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SinkConfig {
    pub endpoint: Option<String>,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregationConfig {
    pub malformed_records: Option<RecordPolicy>,
    pub parallel: Option<bool>,
}

/// Settings shared by the roster and result HTTP clients.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: Option<u64>,
}

fn exclusive(section: &str, endpoint: &Option<String>, path: &Option<String>) -> Result<()> {
    if endpoint.is_some() && path.is_some() {
        return Err(EtlError::ConfigValidationError {
            field: section.to_string(),
            message: "set either `endpoint` or `path`, not both".to_string(),
        });
    }
    Ok(())
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| EtlError::ConfigError {
            message: format!("Cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PARTNER_API_KEY})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn source_spec(&self) -> Result<Option<SourceSpec>> {
        exclusive("source", &self.source.endpoint, &self.source.path)?;
        Ok(match (&self.source.endpoint, &self.source.path) {
            (Some(endpoint), _) => Some(SourceSpec::Http(endpoint.clone())),
            (None, Some(path)) => Some(SourceSpec::File(PathBuf::from(path))),
            (None, None) => None,
        })
    }

    pub fn sink_spec(&self) -> Result<Option<SinkSpec>> {
        exclusive("sink", &self.sink.endpoint, &self.sink.path)?;
        Ok(match (&self.sink.endpoint, &self.sink.path) {
            (Some(endpoint), _) => Some(SinkSpec::Http(endpoint.clone())),
            (None, Some(path)) => Some(SinkSpec::File(PathBuf::from(path))),
            (None, None) => None,
        })
    }

    pub fn to_run_config(&self) -> Result<RunConfig> {
        self.to_run_config_with_sink(None)
    }

    /// Like [`TomlConfig::to_run_config`], but `sink` (when given) replaces
    /// whatever the file configures.
    pub fn to_run_config_with_sink(&self, sink: Option<SinkSpec>) -> Result<RunConfig> {
        let source = self.source_spec()?;
        let sink = match sink {
            Some(sink) => Some(sink),
            None => self.sink_spec()?,
        };

        let mut config = RunConfig::new(
            validate_required_field("source.endpoint or source.path", &source)?.clone(),
            validate_required_field("sink.endpoint or sink.path", &sink)?.clone(),
        );
        config.record_policy = self.aggregation.malformed_records.unwrap_or_default();
        config.parallel = self.aggregation.parallel.unwrap_or(false);
        config.timeout_seconds = self.http.timeout_seconds;
        Ok(config)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.to_run_config()?.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[source]
endpoint = "https://api.example.com/partners?userKey=abc"

[sink]
endpoint = "https://api.example.com/results?userKey=abc"

[aggregation]
malformed_records = "skip"
parallel = true

[http]
timeout_seconds = 15
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let run = config.to_run_config().unwrap();

        assert_eq!(
            run.source,
            SourceSpec::Http("https://api.example.com/partners?userKey=abc".to_string())
        );
        assert_eq!(run.record_policy, RecordPolicy::Skip);
        assert!(run.parallel);
        assert_eq!(run.timeout_seconds, Some(15));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_when_aggregation_missing() {
        let toml_content = r#"
[source]
path = "partners.json"

[sink]
path = "out/report.json"
"#;

        let run = TomlConfig::from_toml_str(toml_content)
            .unwrap()
            .to_run_config()
            .unwrap();

        assert_eq!(run.source, SourceSpec::File(PathBuf::from("partners.json")));
        assert_eq!(run.sink, SinkSpec::File(PathBuf::from("out/report.json")));
        assert_eq!(run.record_policy, RecordPolicy::Strict);
        assert!(!run.parallel);
        assert_eq!(run.timeout_seconds, None);
    }

    #[test]
    fn test_timeout_under_source_is_rejected() {
        let toml_content = r#"
[source]
endpoint = "https://api.example.com/partners"
timeout_seconds = 15

[sink]
endpoint = "https://api.example.com/results"
"#;

        assert!(matches!(
            TomlConfig::from_toml_str(toml_content),
            Err(EtlError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PARTNER_SUMMIT_TEST_KEY", "secret-123");

        let toml_content = r#"
[source]
endpoint = "https://api.example.com/partners?userKey=${PARTNER_SUMMIT_TEST_KEY}"

[sink]
endpoint = "https://api.example.com/results?userKey=${PARTNER_SUMMIT_UNSET_KEY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.source.endpoint.as_deref(),
            Some("https://api.example.com/partners?userKey=secret-123")
        );
        assert_eq!(
            config.sink.endpoint.as_deref(),
            Some("https://api.example.com/results?userKey=${PARTNER_SUMMIT_UNSET_KEY}")
        );

        std::env::remove_var("PARTNER_SUMMIT_TEST_KEY");
    }

    #[test]
    fn test_endpoint_and_path_are_exclusive() {
        let toml_content = r#"
[source]
endpoint = "https://api.example.com/partners"
path = "partners.json"

[sink]
path = "report.json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.to_run_config(),
            Err(EtlError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_missing_sink_is_reported() {
        let toml_content = r#"
[source]
endpoint = "https://api.example.com/partners"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.to_run_config(),
            Err(EtlError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(TomlConfig::from_toml_str("[source\nendpoint=").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[source]
endpoint = "http://localhost:8080/partners"

[sink]
endpoint = "http://localhost:8080/results"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(
            config.sink_spec().unwrap(),
            Some(SinkSpec::Http("http://localhost:8080/results".to_string()))
        );
    }
}
