use crate::config::toml_config::TomlConfig;
use crate::config::{RunConfig, SinkSpec};
use crate::domain::model::RecordPolicy;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

/// Command-line flags. Anything given here overrides the config file.
#[derive(Debug, Clone, Parser)]
#[command(name = "partner-summit")]
#[command(about = "Pick the best two-day meeting start date for each partner country")]
pub struct CliArgs {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Partner roster endpoint (HTTP GET)
    #[arg(long, conflicts_with = "source_file")]
    pub source_url: Option<String>,

    /// Read the partner roster from a JSON file instead
    #[arg(long)]
    pub source_file: Option<PathBuf>,

    /// Result endpoint (HTTP POST)
    #[arg(long, conflicts_with = "sink_file")]
    pub sink_url: Option<String>,

    /// Write the report to a JSON file instead
    #[arg(long)]
    pub sink_file: Option<PathBuf>,

    /// Print the report to stdout and submit nothing
    #[arg(long, conflicts_with_all = ["sink_url", "sink_file"])]
    pub dry_run: bool,

    /// What to do with malformed partner records
    #[arg(long, value_enum)]
    pub policy: Option<RecordPolicy>,

    /// Aggregate countries concurrently
    #[arg(long)]
    pub parallel: bool,

    /// HTTP request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl CliArgs {
    /// Merge the optional config file with command-line overrides.
    pub fn resolve(&self) -> Result<RunConfig> {
        let mut file = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(url) = &self.source_url {
            file.source.endpoint = Some(url.clone());
            file.source.path = None;
        }
        if let Some(path) = &self.source_file {
            file.source.endpoint = None;
            file.source.path = Some(path.to_string_lossy().into_owned());
        }
        if let Some(url) = &self.sink_url {
            file.sink.endpoint = Some(url.clone());
            file.sink.path = None;
        }
        if let Some(path) = &self.sink_file {
            file.sink.endpoint = None;
            file.sink.path = Some(path.to_string_lossy().into_owned());
        }
        if let Some(policy) = self.policy {
            file.aggregation.malformed_records = Some(policy);
        }
        if self.parallel {
            file.aggregation.parallel = Some(true);
        }
        if let Some(timeout) = self.timeout_secs {
            file.http.timeout_seconds = Some(timeout);
        }

        if self.dry_run {
            // 試跑只輸出到 stdout，不需要結果端點
            return file.to_run_config_with_sink(Some(SinkSpec::Stdout));
        }

        file.to_run_config()
    }
}
