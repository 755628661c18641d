use crate::core::ingest::{IngestSummary, IngestWorker, QueuedLine};
use crate::core::writer::{to_csv_bytes, COSTS_FILE, FUELINGS_FILE};
use crate::core::{ConfigProvider, LoadReport, OutputSet, Pipeline, SourceRecord, Storage};
use crate::domain::output::WrittenFile;
use crate::domain::target::{COST_HEADER, FUELING_HEADER};
use crate::utils::error::{EtlError, Result};
use std::sync::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// motostat lines in, spritmonitor files out.
pub struct ConversionPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    worker: Mutex<Option<IngestWorker>>,
    summary: Mutex<Option<IngestSummary>>,
}

impl<S: Storage, C: ConfigProvider> ConversionPipeline<S, C> {
    /// Builds the pipeline together with the sending side of its line queue.
    ///
    /// Cancelling `stop` tells the worker to finish once the queue is drained.
    pub fn new(
        storage: S,
        config: C,
        stop: CancellationToken,
    ) -> (Self, mpsc::Sender<QueuedLine>) {
        let (tx, rx) = mpsc::channel(config.queue_capacity());
        let worker = IngestWorker::new(rx, stop, config.use_miles(), config.poll_interval());
        let pipeline = Self {
            storage,
            config,
            worker: Mutex::new(Some(worker)),
            summary: Mutex::new(None),
        };
        (pipeline, tx)
    }

    /// Counters of the finished extract step.
    pub fn ingest_summary(&self) -> Option<IngestSummary> {
        self.summary.lock().ok().and_then(|s| s.clone())
    }

    async fn write_table<T: serde::Serialize>(
        &self,
        name: &str,
        header: &[&str],
        rows: &[T],
    ) -> Result<Option<WrittenFile>> {
        if rows.is_empty() {
            tracing::debug!("No rows for {}, not writing it", name);
            return Ok(None);
        }
        let data = to_csv_bytes(header, rows)?;
        let path = self.storage.write_file(name, &data).await?;
        tracing::info!("Wrote {} rows to {}", rows.len(), path);
        Ok(Some(WrittenFile {
            path,
            rows: rows.len(),
        }))
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ConversionPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<SourceRecord>> {
        let worker = self
            .worker
            .lock()
            .map_err(|_| EtlError::ProcessingError {
                message: "ingest worker lock poisoned".to_string(),
            })?
            .take()
            .ok_or_else(|| EtlError::ProcessingError {
                message: "input has already been consumed".to_string(),
            })?;

        let (records, summary) = worker.run().await?;
        tracing::info!(
            "Found {} records in {} lines ({} skipped, {} rejected)",
            summary.records,
            summary.lines,
            summary.skipped,
            summary.rejected
        );
        if let Ok(mut slot) = self.summary.lock() {
            *slot = Some(summary);
        }
        Ok(records)
    }

    async fn transform(&self, data: Vec<SourceRecord>) -> Result<OutputSet> {
        let output = OutputSet::from_records(&data)?;
        tracing::debug!(
            "Prepared {} cost rows and {} fueling rows",
            output.costs.len(),
            output.fuelings.len()
        );
        if output.dropped_fuelings > 0 {
            tracing::warn!("{} fuelings could not be converted", output.dropped_fuelings);
        }
        Ok(output)
    }

    async fn load(&self, result: OutputSet) -> Result<LoadReport> {
        tracing::trace!("Writing into {}", self.config.output_path().display());
        let mut report = LoadReport::default();
        if let Some(file) = self.write_table(COSTS_FILE, &COST_HEADER, &result.costs).await? {
            report.files.push(file);
        }
        let fuelings = self
            .write_table(FUELINGS_FILE, &FUELING_HEADER, &result.fuelings)
            .await?;
        if let Some(file) = fuelings {
            report.files.push(file);
        }
        Ok(report)
    }
}
