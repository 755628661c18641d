//! Reader and worker sides of the line queue.
//!
//! The reader pushes assembled lines into a bounded channel. The worker
//! polls it without blocking, sleeping on an empty queue, and stops only
//! once it has been told to stop and nothing is left to consume.

use crate::domain::model::SourceRecord;
use crate::utils::error::{EtlError, Result};
use std::io;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio_util::sync::CancellationToken;

/// Rebuilds records split over several physical lines.
///
/// A chunk ending in `\r\n` continues on the next one; the first chunk
/// ending any other way completes the line.
#[derive(Debug, Default)]
pub struct LineAssembler {
    buffer: String,
}

impl LineAssembler {
    pub fn push(&mut self, chunk: &str) -> Option<String> {
        self.buffer.push_str(chunk);
        if self.buffer.ends_with("\r\n") {
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }

    /// Whatever is still buffered at end of input.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }
}

/// Queue item: an assembled line, or the read error that ended the input.
pub type QueuedLine = io::Result<String>;

/// Reads `reader` to the end (or until `stop` fires) and queues every line.
///
/// Returns the number of lines queued. Dropping `tx` on return closes the
/// channel. A read error is queued as well, so the worker fails instead of
/// treating the truncated input as complete.
pub async fn feed_lines<R>(
    mut reader: R,
    tx: mpsc::Sender<QueuedLine>,
    stop: CancellationToken,
) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut assembler = LineAssembler::default();
    let mut chunk = Vec::new();
    let mut queued = 0;

    loop {
        chunk.clear();
        let read = tokio::select! {
            read = reader.read_until(b'\n', &mut chunk) => match read {
                Ok(n) => n,
                Err(e) => {
                    let _ = tx.send(Err(io::Error::new(e.kind(), e.to_string()))).await;
                    return Err(e.into());
                }
            },
            _ = stop.cancelled() => {
                tracing::debug!("Reader interrupted after {} lines", queued);
                break;
            }
        };
        if read == 0 {
            break;
        }
        if let Some(line) = assembler.push(&String::from_utf8_lossy(&chunk)) {
            if tx.send(Ok(line)).await.is_err() {
                tracing::warn!("Worker is gone, stopping reader");
                return Ok(queued);
            }
            queued += 1;
        }
    }

    if let Some(line) = assembler.finish() {
        if tx.send(Ok(line)).await.is_ok() {
            queued += 1;
        }
    }
    Ok(queued)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub lines: usize,
    pub records: usize,
    /// Header rows and rows with the wrong number of columns.
    pub skipped: usize,
    /// Rows with an unreadable date or id.
    pub rejected: usize,
}

pub struct IngestWorker {
    rx: mpsc::Receiver<QueuedLine>,
    stop: CancellationToken,
    use_miles: bool,
    poll_interval: Duration,
}

impl IngestWorker {
    pub fn new(
        rx: mpsc::Receiver<QueuedLine>,
        stop: CancellationToken,
        use_miles: bool,
        poll_interval: Duration,
    ) -> Self {
        Self {
            rx,
            stop,
            use_miles,
            poll_interval,
        }
    }

    /// Drains the queue into records.
    ///
    /// Ends when the stop token is cancelled and the queue is empty, or when
    /// every sender is gone and the queue is empty. A queued read error or a
    /// non-recoverable parse error ends the run with that error.
    pub async fn run(mut self) -> Result<(Vec<SourceRecord>, IngestSummary)> {
        tracing::trace!("Ingest worker started");
        let mut records = Vec::new();
        let mut summary = IngestSummary::default();

        loop {
            match self.rx.try_recv() {
                Ok(Ok(line)) => {
                    summary.lines += 1;
                    self.consume(&line, summary.lines, &mut records, &mut summary)?;
                }
                Ok(Err(e)) => {
                    tracing::error!("Input ended with a read error after {} lines", summary.lines);
                    return Err(EtlError::IoError(e));
                }
                Err(TryRecvError::Empty) => {
                    if self.stop.is_cancelled() {
                        tracing::debug!("stopping...");
                        break;
                    }
                    tokio::select! {
                        _ = tokio::time::sleep(self.poll_interval) => {}
                        _ = self.stop.cancelled() => {}
                    }
                }
                Err(TryRecvError::Disconnected) => break,
            }
        }

        summary.records = records.len();
        tracing::debug!("stopped.");
        Ok((records, summary))
    }

    fn consume(
        &self,
        line: &str,
        line_no: usize,
        records: &mut Vec<SourceRecord>,
        summary: &mut IngestSummary,
    ) -> Result<()> {
        match SourceRecord::parse(line.trim(), self.use_miles) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {
                tracing::trace!("Skipping line {}", line_no);
                summary.skipped += 1;
            }
            Err(e) if e.is_recoverable() => {
                tracing::warn!("Rejecting line {}: {}", line_no, e);
                summary.rejected += 1;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}
