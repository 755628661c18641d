pub mod etl;
pub mod ingest;
pub mod pipeline;
pub mod writer;

pub use crate::domain::model::SourceRecord;
pub use crate::domain::output::{LoadReport, OutputSet};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
