use crate::core::report::{build_report, build_report_parallel};
use crate::core::roster::parse_partners;
use crate::core::{ConfigProvider, Partner, PartnerSource, Pipeline, Report, ResultSink};
use crate::domain::model::SubmitReceipt;
use crate::utils::error::Result;

/// Roster source -> per-country start dates -> result sink.
pub struct InvitationPipeline<S: PartnerSource, K: ResultSink, C: ConfigProvider> {
    pub(crate) source: S,
    pub(crate) sink: K,
    pub(crate) config: C,
}

impl<S: PartnerSource, K: ResultSink, C: ConfigProvider> InvitationPipeline<S, K, C> {
    pub fn new(source: S, sink: K, config: C) -> Self {
        Self {
            source,
            sink,
            config,
        }
    }
}

#[async_trait::async_trait]
impl<S: PartnerSource, K: ResultSink, C: ConfigProvider> Pipeline for InvitationPipeline<S, K, C> {
    async fn extract(&self) -> Result<Vec<Partner>> {
        tracing::debug!("Fetching partner roster from: {}", self.source.location());
        let records = self.source.fetch_partners().await?;
        tracing::debug!("Received {} raw partner records", records.len());

        parse_partners(records, self.config.record_policy())
    }

    async fn transform(&self, partners: Vec<Partner>) -> Result<Report> {
        if self.config.parallel() {
            tracing::debug!("Aggregating countries in parallel");
            build_report_parallel(partners.into()).await
        } else {
            Ok(build_report(&partners))
        }
    }

    async fn load(&self, report: &Report) -> Result<SubmitReceipt> {
        tracing::debug!("Submitting report to: {}", self.sink.location());
        self.sink.submit(report).await
    }
}
