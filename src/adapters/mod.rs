// Adapters layer: concrete partner sources and result sinks.

pub mod file;
pub mod http;

use crate::config::{SinkSpec, SourceSpec};
use crate::domain::model::{Report, SubmitReceipt};
use crate::domain::ports::{PartnerSource, ResultSink};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub use file::{FilePartnerSource, FileResultSink, StdoutResultSink};
pub use http::{HttpPartnerSource, HttpResultSink};

/// Source selected at runtime from configuration.
pub enum Source {
    Http(HttpPartnerSource),
    File(FilePartnerSource),
}

impl Source {
    pub fn from_spec(spec: &SourceSpec, timeout: Option<Duration>) -> Result<Self> {
        Ok(match spec {
            SourceSpec::Http(endpoint) => {
                Source::Http(HttpPartnerSource::new(http::build_client(timeout)?, endpoint))
            }
            SourceSpec::File(path) => Source::File(FilePartnerSource::new(path)),
        })
    }
}

#[async_trait]
impl PartnerSource for Source {
    fn location(&self) -> &str {
        match self {
            Source::Http(source) => source.location(),
            Source::File(source) => source.location(),
        }
    }

    async fn fetch_partners(&self) -> Result<Vec<serde_json::Value>> {
        match self {
            Source::Http(source) => source.fetch_partners().await,
            Source::File(source) => source.fetch_partners().await,
        }
    }
}

/// Sink selected at runtime from configuration.
pub enum Sink {
    Http(HttpResultSink),
    File(FileResultSink),
    Stdout(StdoutResultSink),
}

impl Sink {
    pub fn from_spec(spec: &SinkSpec, timeout: Option<Duration>) -> Result<Self> {
        Ok(match spec {
            SinkSpec::Http(endpoint) => {
                Sink::Http(HttpResultSink::new(http::build_client(timeout)?, endpoint))
            }
            SinkSpec::File(path) => Sink::File(FileResultSink::new(path)),
            SinkSpec::Stdout => Sink::Stdout(StdoutResultSink),
        })
    }
}

#[async_trait]
impl ResultSink for Sink {
    fn location(&self) -> &str {
        match self {
            Sink::Http(sink) => sink.location(),
            Sink::File(sink) => sink.location(),
            Sink::Stdout(sink) => sink.location(),
        }
    }

    async fn submit(&self, report: &Report) -> Result<SubmitReceipt> {
        match self {
            Sink::Http(sink) => sink.submit(report).await,
            Sink::File(sink) => sink.submit(report).await,
            Sink::Stdout(sink) => sink.submit(report).await,
        }
    }
}
