use crate::core::Pipeline;
use crate::domain::model::RunSummary;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Fetch, aggregate and submit once. The first failing stage ends the run.
    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("🚀 Starting partner summit run");

        // Extract
        let started = Instant::now();
        let partners = self.pipeline.extract().await?;
        tracing::info!(
            "📥 Loaded {} partners in {:?}",
            partners.len(),
            started.elapsed()
        );

        // Transform
        let started = Instant::now();
        let report = self.pipeline.transform(partners).await?;
        tracing::info!(
            "🧮 Computed start dates for {} countries in {:?}",
            report.len(),
            started.elapsed()
        );

        // Load
        let started = Instant::now();
        let receipt = match self.pipeline.load(&report).await {
            Ok(receipt) => receipt,
            Err(e) => {
                // The report is still valid; keep it visible for inspection.
                match serde_json::to_string(&report) {
                    Ok(json) => tracing::warn!("Unsubmitted report: {}", json),
                    Err(encode_err) => {
                        tracing::warn!("Unsubmitted report could not be encoded: {}", encode_err)
                    }
                }
                return Err(e);
            }
        };
        tracing::info!(
            "📤 Report delivered to {} in {:?}",
            receipt.destination,
            started.elapsed()
        );

        Ok(RunSummary { report, receipt })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::build_report;
    use crate::domain::model::{Partner, Report, SubmitReceipt};
    use crate::utils::error::{EtlError, RunStage};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct StubPipeline {
        fail_extract: bool,
        fail_load: bool,
        transformed: AtomicBool,
    }

    impl StubPipeline {
        fn new(fail_extract: bool, fail_load: bool) -> Self {
            Self {
                fail_extract,
                fail_load,
                transformed: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl Pipeline for StubPipeline {
        async fn extract(&self) -> Result<Vec<Partner>> {
            if self.fail_extract {
                return Err(EtlError::SourceUnavailable {
                    endpoint: "stub".to_string(),
                    status: Some(500),
                    message: "HTTP 500".to_string(),
                });
            }
            let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            Ok(vec![Partner::new("US", "a@x", [day, day.succ_opt().unwrap()])])
        }

        async fn transform(&self, partners: Vec<Partner>) -> Result<Report> {
            self.transformed.store(true, Ordering::SeqCst);
            Ok(build_report(&partners))
        }

        async fn load(&self, _report: &Report) -> Result<SubmitReceipt> {
            if self.fail_load {
                return Err(EtlError::SinkUnavailable {
                    endpoint: "stub".to_string(),
                    status: Some(400),
                    message: "HTTP 400".to_string(),
                });
            }
            Ok(SubmitReceipt {
                destination: "stub".to_string(),
                status: Some(200),
                body: String::new(),
            })
        }
    }

    #[tokio::test]
    async fn test_run_returns_report_and_receipt() {
        let engine = EtlEngine::new(StubPipeline::new(false, false));

        let summary = engine.run().await.unwrap();

        assert_eq!(summary.report.len(), 1);
        assert_eq!(summary.receipt.status, Some(200));
    }

    #[tokio::test]
    async fn test_extract_failure_stops_before_transform() {
        let pipeline = StubPipeline::new(true, false);
        let engine = EtlEngine::new(pipeline);

        let err = engine.run().await.unwrap_err();

        assert_eq!(err.stage(), RunStage::Fetch);
        assert!(!engine.pipeline.transformed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_load_failure_is_reported_as_submission() {
        let engine = EtlEngine::new(StubPipeline::new(false, true));

        let err = engine.run().await.unwrap_err();

        assert_eq!(err.stage(), RunStage::Submission);
        assert!(engine.pipeline.transformed.load(Ordering::SeqCst));
    }
}
