//! # Entity Handle
//!
//! Caller-side address of one live entity. Request/response calls carry an
//! explicit deadline and surface a typed timeout; fire-and-forget sends
//! return as soon as the bounded mailbox accepts the command, which is what
//! gives upstream producers their backpressure.

use crate::command::{EntityError, SubmissionCommand};
use shared_types::{Submission, SubmissionEvent, SubmissionId};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Handle addressing one live submission entity.
#[derive(Clone)]
pub struct EntityHandle {
    id: SubmissionId,
    tx: mpsc::Sender<SubmissionCommand>,
    generation: u64,
    ask_timeout: Duration,
}

impl EntityHandle {
    pub(crate) fn new(
        id: SubmissionId,
        tx: mpsc::Sender<SubmissionCommand>,
        generation: u64,
        ask_timeout: Duration,
    ) -> Self {
        Self {
            id,
            tx,
            generation,
            ask_timeout,
        }
    }

    /// The submission this handle addresses.
    #[must_use]
    pub fn id(&self) -> &SubmissionId {
        &self.id
    }

    /// Activation generation; used by the registry to evict stale entries.
    #[must_use]
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the entity task still accepts commands.
    #[must_use]
    pub fn is_live(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Current record; no side effect.
    pub async fn get_submission(&self) -> Result<Submission, EntityError> {
        let (reply, rx) = oneshot::channel();
        self.send(SubmissionCommand::GetSubmission { reply }).await?;
        self.await_reply(rx, "GetSubmission").await
    }

    /// Create a fresh submission.
    pub async fn create_submission(
        &self,
        timestamp: u64,
    ) -> Result<SubmissionEvent, EntityError> {
        let (reply, rx) = oneshot::channel();
        self.send(SubmissionCommand::CreateSubmission { timestamp, reply })
            .await?;
        self.await_reply(rx, "CreateSubmission").await?
    }

    /// Validate and replace the record.
    pub async fn modify_submission(
        &self,
        record: Submission,
    ) -> Result<SubmissionEvent, EntityError> {
        let (reply, rx) = oneshot::channel();
        self.send(SubmissionCommand::ModifySubmission { record, reply })
            .await?;
        self.await_reply(rx, "ModifySubmission").await?
    }

    /// Mark the upload as started.
    pub async fn start_upload(&self, timestamp: u64) -> Result<SubmissionEvent, EntityError> {
        let (reply, rx) = oneshot::channel();
        self.send(SubmissionCommand::StartUpload { timestamp, reply })
            .await?;
        self.await_reply(rx, "StartUpload").await?
    }

    /// Mark the upload as complete.
    pub async fn complete_upload(&self, timestamp: u64) -> Result<SubmissionEvent, EntityError> {
        let (reply, rx) = oneshot::channel();
        self.send(SubmissionCommand::CompleteUpload { timestamp, reply })
            .await?;
        self.await_reply(rx, "CompleteUpload").await?
    }

    /// Append one raw line, fire-and-forget. Suspends while the mailbox is
    /// full, which is the caller's demand-driven flow control.
    pub async fn add_line(&self, timestamp: u64, data: String) -> Result<(), EntityError> {
        self.send(SubmissionCommand::AddLine { timestamp, data })
            .await
    }

    /// Request graceful deactivation. Best effort: an already-dead entity is
    /// fine.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(SubmissionCommand::Shutdown).await;
    }

    async fn send(&self, cmd: SubmissionCommand) -> Result<(), EntityError> {
        self.tx
            .send(cmd)
            .await
            .map_err(|_| EntityError::Deactivated)
    }

    async fn await_reply<T>(
        &self,
        rx: oneshot::Receiver<T>,
        operation: &'static str,
    ) -> Result<T, EntityError> {
        match tokio::time::timeout(self.ask_timeout, rx).await {
            Ok(Ok(value)) => Ok(value),
            // Reply sender dropped: the entity deactivated mid-request.
            Ok(Err(_)) => Err(EntityError::Deactivated),
            Err(_) => Err(EntityError::Timeout { operation }),
        }
    }
}
