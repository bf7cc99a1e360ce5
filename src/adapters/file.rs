use crate::domain::model::{PartnerEnvelope, Report, SubmitReceipt};
use crate::domain::ports::{PartnerSource, ResultSink};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use std::path::PathBuf;

/// Roster read from a JSON file with the same shape as the partner API.
#[derive(Debug, Clone)]
pub struct FilePartnerSource {
    path: PathBuf,
    display: String,
}

impl FilePartnerSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display = path.display().to_string();
        Self { path, display }
    }

    fn unavailable(&self, message: String) -> EtlError {
        EtlError::SourceUnavailable {
            endpoint: self.display.clone(),
            status: None,
            message,
        }
    }
}

#[async_trait]
impl PartnerSource for FilePartnerSource {
    fn location(&self) -> &str {
        &self.display
    }

    async fn fetch_partners(&self) -> Result<Vec<serde_json::Value>> {
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|e| self.unavailable(e.to_string()))?;
        let envelope: PartnerEnvelope = serde_json::from_slice(&data)
            .map_err(|e| self.unavailable(format!("Invalid partner document: {}", e)))?;
        Ok(envelope.partners)
    }
}

/// Report written as pretty JSON, replacing any existing file.
#[derive(Debug, Clone)]
pub struct FileResultSink {
    path: PathBuf,
    display: String,
}

impl FileResultSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display = path.display().to_string();
        Self { path, display }
    }

    fn unavailable(&self, message: String) -> EtlError {
        EtlError::SinkUnavailable {
            endpoint: self.display.clone(),
            status: None,
            message,
        }
    }
}

#[async_trait]
impl ResultSink for FileResultSink {
    fn location(&self) -> &str {
        &self.display
    }

    async fn submit(&self, report: &Report) -> Result<SubmitReceipt> {
        let json = serde_json::to_vec_pretty(report)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.unavailable(e.to_string()))?;
        }

        tokio::fs::write(&self.path, &json)
            .await
            .map_err(|e| self.unavailable(e.to_string()))?;

        tracing::debug!("Wrote {} bytes to {}", json.len(), self.display);
        Ok(SubmitReceipt {
            destination: self.display.clone(),
            status: None,
            body: String::new(),
        })
    }
}

/// Prints the report to stdout instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct StdoutResultSink;

#[async_trait]
impl ResultSink for StdoutResultSink {
    fn location(&self) -> &str {
        "stdout"
    }

    async fn submit(&self, report: &Report) -> Result<SubmitReceipt> {
        let json = serde_json::to_string_pretty(report)?;
        println!("{}", json);
        Ok(SubmitReceipt {
            destination: "stdout".to_string(),
            status: None,
            body: String::new(),
        })
    }
}
