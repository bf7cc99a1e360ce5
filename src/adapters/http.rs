use crate::domain::model::{PartnerEnvelope, Report, SubmitReceipt};
use crate::domain::ports::{PartnerSource, ResultSink};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub fn build_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| EtlError::ConfigError {
        message: format!("Failed to build HTTP client: {}", e),
    })
}

/// Roster fetched with a single GET.
pub struct HttpPartnerSource {
    client: Client,
    endpoint: String,
}

impl HttpPartnerSource {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    fn unavailable(&self, status: Option<u16>, message: String) -> EtlError {
        EtlError::SourceUnavailable {
            endpoint: self.endpoint.clone(),
            status,
            message,
        }
    }
}

#[async_trait]
impl PartnerSource for HttpPartnerSource {
    fn location(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_partners(&self) -> Result<Vec<serde_json::Value>> {
        tracing::debug!("Making API request to: {}", self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| self.unavailable(None, e.to_string()))?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(self.unavailable(Some(status.as_u16()), format!("HTTP {}", status)));
        }

        let envelope: PartnerEnvelope = response
            .json()
            .await
            .map_err(|e| self.unavailable(Some(status.as_u16()), format!("Invalid partner document: {}", e)))?;

        Ok(envelope.partners)
    }
}

/// Report submitted with a single JSON POST.
pub struct HttpResultSink {
    client: Client,
    endpoint: String,
}

impl HttpResultSink {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ResultSink for HttpResultSink {
    fn location(&self) -> &str {
        &self.endpoint
    }

    async fn submit(&self, report: &Report) -> Result<SubmitReceipt> {
        tracing::debug!(
            "Posting {} country results to: {}",
            report.len(),
            self.endpoint
        );
        let response = self
            .client
            .post(&self.endpoint)
            .json(report)
            .send()
            .await
            .map_err(|e| EtlError::SinkUnavailable {
                endpoint: self.endpoint.clone(),
                status: None,
                message: e.to_string(),
            })?;

        let status = response.status();
        // The status decides the outcome; an unreadable body is reported as empty.
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("Could not read result endpoint response body: {}", e);
                String::new()
            }
        };
        tracing::debug!("Result endpoint answered {}: {}", status, body);

        if !status.is_success() {
            return Err(EtlError::SinkUnavailable {
                endpoint: self.endpoint.clone(),
                status: Some(status.as_u16()),
                message: if body.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    format!("HTTP {}: {}", status, body)
                },
            });
        }

        Ok(SubmitReceipt {
            destination: self.endpoint.clone(),
            status: Some(status.as_u16()),
            body,
        })
    }
}
