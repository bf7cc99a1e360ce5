use crate::domain::model::{Partner, RecordPolicy, Report, SubmitReceipt};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Where the partner roster comes from.
#[async_trait]
pub trait PartnerSource: Send + Sync {
    /// Human-readable location, used in logs and errors.
    fn location(&self) -> &str;

    /// Fetch the raw roster entries. One attempt, no retries.
    async fn fetch_partners(&self) -> Result<Vec<serde_json::Value>>;
}

/// Where the finished report goes.
#[async_trait]
pub trait ResultSink: Send + Sync {
    fn location(&self) -> &str;

    async fn submit(&self, report: &Report) -> Result<SubmitReceipt>;
}

pub trait ConfigProvider: Send + Sync {
    fn record_policy(&self) -> RecordPolicy;
    fn parallel(&self) -> bool;
    fn request_timeout(&self) -> Option<Duration>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Partner>>;
    async fn transform(&self, partners: Vec<Partner>) -> Result<Report>;
    async fn load(&self, report: &Report) -> Result<SubmitReceipt>;
}
