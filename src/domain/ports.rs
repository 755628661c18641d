use crate::domain::model::SourceRecord;
use crate::domain::output::{LoadReport, OutputSet};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

pub trait Storage: Send + Sync {
    /// Makes sure files can be written; called before any input is read.
    fn prepare(&self) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Writes `data` under `name` and returns the full path written.
    fn write_file(
        &self,
        name: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &Path;
    fn use_miles(&self) -> bool;
    fn queue_capacity(&self) -> usize;
    fn poll_interval(&self) -> Duration;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<SourceRecord>>;
    async fn transform(&self, data: Vec<SourceRecord>) -> Result<OutputSet>;
    async fn load(&self, result: OutputSet) -> Result<LoadReport>;
}
