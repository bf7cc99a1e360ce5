pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::{Sink, Source};
pub use app::pipelines::InvitationPipeline;
pub use config::{RunConfig, SinkSpec, SourceSpec};
pub use crate::core::{etl::EtlEngine, report::build_report};
pub use domain::model::{CountryResult, Partner, RecordPolicy, Report};
pub use utils::error::{EtlError, Result};
