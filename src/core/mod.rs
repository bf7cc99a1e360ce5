pub mod aggregator;
pub mod etl;
pub mod report;
pub mod roster;

pub use crate::domain::model::{CountryResult, Partner, Report};
pub use crate::domain::ports::{ConfigProvider, PartnerSource, Pipeline, ResultSink};
pub use crate::utils::error::Result;
