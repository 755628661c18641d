pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, ConverterConfig};

pub use core::{etl::EtlEngine, ingest::feed_lines, pipeline::ConversionPipeline};
pub use domain::model::SourceRecord;
pub use domain::target::{transform, TargetRecord};
pub use utils::error::{EtlError, Result};
