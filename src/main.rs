use clap::Parser;
use partner_summit::core::ConfigProvider;
use partner_summit::domain::model::RunSummary;
use partner_summit::utils::{logger, validation::Validate};
use partner_summit::{CliArgs, EtlEngine, EtlError, InvitationPipeline, Sink, Source};
use std::process::ExitCode;

async fn run(args: &CliArgs) -> Result<RunSummary, EtlError> {
    let config = args.resolve()?;
    if args.verbose {
        tracing::debug!("Run config: {:?}", config);
    }

    // 驗證配置
    config.validate()?;

    let source = Source::from_spec(&config.source, config.request_timeout())?;
    let sink = Sink::from_spec(&config.sink, config.request_timeout())?;

    let pipeline = InvitationPipeline::new(source, sink, config);
    EtlEngine::new(pipeline).run().await
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    match run(&args).await {
        Ok(summary) => {
            tracing::info!(
                "✅ Start dates computed for {} countries",
                summary.report.len()
            );
            if !summary.receipt.body.is_empty() {
                println!("{}", summary.receipt.body);
            }
            if summary.receipt.status.is_some() {
                println!("Result submitted successfully.");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed at stage '{}': {} (Category: {:?}, Severity: {:?})",
                e.stage(),
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            ExitCode::from(e.exit_code())
        }
    }
}
