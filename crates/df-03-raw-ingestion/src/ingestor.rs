//! # Raw Data Ingestor
//!
//! Pumps an upload byte stream into one entity as ordered `AddLine`
//! commands, then signals `CompleteUpload` once the last line has been
//! durably accepted.

use crate::framing::{FrameTooLong, LineFramer};
use bytes::Bytes;
use df_02_submission_entity::{EntityError, EntityHandle};
use futures::{Stream, StreamExt};
use shared_types::{SystemTimeSource, TimeSource};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Failures during streamed ingestion.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The file content violated the framing contract.
    #[error("invalid file format: {0}")]
    InvalidFormat(#[from] FrameTooLong),

    /// The upload source failed mid-stream.
    #[error("upload stream failed: {message}")]
    Source {
        /// Transport detail.
        message: String,
    },

    /// The target entity rejected a command.
    #[error("submission entity failure: {0}")]
    Entity(#[from] EntityError),
}

/// Converts upload byte streams into ordered append commands.
pub struct RawDataIngestor {
    time: Arc<dyn TimeSource>,
}

impl Default for RawDataIngestor {
    fn default() -> Self {
        Self::new(Arc::new(SystemTimeSource))
    }
}

impl RawDataIngestor {
    /// Ingestor with an explicit time source (tests inject a fixed clock).
    #[must_use]
    pub fn new(time: Arc<dyn TimeSource>) -> Self {
        Self { time }
    }

    /// Stream a text-file upload into `entity`.
    ///
    /// Every line becomes one `AddLine(timestamp, line)` command, all
    /// sharing one timestamp captured here at upload start. Appends go
    /// through the entity's bounded mailbox: when the entity lags, the
    /// `await` on each send stops this loop from pulling further bytes.
    ///
    /// On success, sends `CompleteUpload` and returns the line count. On a
    /// source or framing failure, sends `Shutdown` to the entity and returns
    /// the error; lines already appended stay in the log.
    pub async fn ingest<S, E>(
        &self,
        entity: &EntityHandle,
        mut stream: S,
    ) -> Result<u64, IngestError>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: std::fmt::Display,
    {
        let timestamp = self.time.now_millis();
        let mut framer = LineFramer::new();
        let mut line_count = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(bytes) => bytes,
                Err(e) => {
                    self.abort(entity, &e.to_string()).await;
                    return Err(IngestError::Source {
                        message: e.to_string(),
                    });
                }
            };

            let lines = match framer.push(&chunk) {
                Ok(lines) => lines,
                Err(e) => {
                    self.abort(entity, &e.to_string()).await;
                    return Err(e.into());
                }
            };

            for line in lines {
                entity.add_line(timestamp, line).await?;
                line_count += 1;
            }
        }

        // Lenient tail: an unterminated final frame is still a line.
        match framer.finish() {
            Ok(Some(tail)) => {
                entity.add_line(timestamp, tail).await?;
                line_count += 1;
            }
            Ok(None) => {}
            Err(e) => {
                self.abort(entity, &e.to_string()).await;
                return Err(e.into());
            }
        }

        // FIFO mailbox: by the time this ack returns, every line above has
        // been durably accepted.
        entity.complete_upload(timestamp).await?;

        info!(
            subsystem = "df-03",
            id = %entity.id(),
            lines = line_count,
            "Upload ingested"
        );

        Ok(line_count)
    }

    async fn abort(&self, entity: &EntityHandle, reason: &str) {
        warn!(
            subsystem = "df-03",
            id = %entity.id(),
            reason,
            "Ingestion failed, shutting entity down"
        );
        entity.shutdown().await;
    }
}
