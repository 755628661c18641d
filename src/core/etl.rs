use crate::core::{LoadReport, Pipeline};
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<LoadReport> {
        tracing::debug!("Collecting records...");
        let records = self.pipeline.extract().await?;

        if records.is_empty() {
            tracing::info!("No records found, nothing to write");
            return Ok(LoadReport::default());
        }

        tracing::debug!("Converting {} records...", records.len());
        let output = self.pipeline.transform(records).await?;

        tracing::debug!("Writing output files...");
        let report = self.pipeline.load(output).await?;
        tracing::debug!("Wrote {} files", report.files.len());

        Ok(report)
    }
}
