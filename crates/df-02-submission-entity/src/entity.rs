//! # Entity Event Loop
//!
//! The single-writer task owning one submission's record. One instance per
//! live id; the registry guarantees uniqueness, this module guarantees
//! ordering and durability.

use crate::command::{EntityError, SubmissionCommand};
use crate::handle::EntityHandle;
use dashmap::DashMap;
use df_01_event_log::{recover, EventStore, Snapshot, SNAPSHOT_INTERVAL};
use shared_types::{Submission, SubmissionEvent, SubmissionId, SubmissionStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Loop control after handling one command.
#[derive(PartialEq)]
enum Flow {
    Continue,
    Stop,
}

/// State carried by a live entity task.
pub(crate) struct EntityRuntime {
    id: SubmissionId,
    key: String,
    store: Arc<dyn EventStore>,
    state: Submission,
    last_seq: u64,
}

impl EntityRuntime {
    /// Activate an entity: recover state from the log, then run the mailbox
    /// loop until shutdown or idle timeout. Removes itself from `partition`
    /// on exit.
    pub(crate) fn spawn(
        id: SubmissionId,
        store: Arc<dyn EventStore>,
        partition: Arc<DashMap<SubmissionId, EntityHandle>>,
        generation: u64,
        mailbox_capacity: usize,
        idle_timeout: Duration,
        ask_timeout: Duration,
    ) -> Result<EntityHandle, EntityError> {
        let key = id.log_key();
        let recovered = recover(store.as_ref(), &key)?;

        let (tx, rx) = mpsc::channel(mailbox_capacity);
        let handle = EntityHandle::new(id.clone(), tx, generation, ask_timeout);

        let runtime = Self {
            id: id.clone(),
            key,
            store,
            state: recovered.record,
            last_seq: recovered.last_seq,
        };

        info!(
            subsystem = "df-02",
            id = %id,
            last_seq = runtime.last_seq,
            status = %runtime.state.status,
            "Entity activated"
        );

        tokio::spawn(runtime.run(rx, partition, generation, idle_timeout));

        Ok(handle)
    }

    async fn run(
        mut self,
        mut rx: mpsc::Receiver<SubmissionCommand>,
        partition: Arc<DashMap<SubmissionId, EntityHandle>>,
        generation: u64,
        idle_timeout: Duration,
    ) {
        loop {
            let deadline = Instant::now() + idle_timeout;
            tokio::select! {
                maybe_cmd = rx.recv() => {
                    match maybe_cmd {
                        Some(cmd) => {
                            if self.handle_command(cmd) == Flow::Stop {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                _ = tokio::time::sleep_until(deadline) => {
                    debug!(subsystem = "df-02", id = %self.id, "Entity idle, passivating");
                    break;
                }
            }
        }

        // Remove only our own registration; a successor may already exist.
        partition.remove_if(&self.id, |_, handle| handle.generation() == generation);
        rx.close();
        info!(subsystem = "df-02", id = %self.id, "Entity deactivated");
    }

    fn handle_command(&mut self, cmd: SubmissionCommand) -> Flow {
        match cmd {
            SubmissionCommand::GetSubmission { reply } => {
                let _ = reply.send(self.state.clone());
            }

            SubmissionCommand::CreateSubmission { timestamp, reply } => {
                let result = self.create(timestamp);
                let _ = reply.send(result);
            }

            SubmissionCommand::ModifySubmission { record, reply } => {
                let result = self.modify(record);
                let _ = reply.send(result);
            }

            SubmissionCommand::AddLine { timestamp, data } => {
                // Fire-and-forget: persistence failures can only be logged.
                if let Err(e) = self.persist(SubmissionEvent::LineAdded { timestamp, data }) {
                    error!(
                        subsystem = "df-02",
                        id = %self.id,
                        error = %e,
                        "Failed to persist LineAdded"
                    );
                }
            }

            SubmissionCommand::StartUpload { timestamp, reply } => {
                let result = self.start_upload(timestamp);
                let _ = reply.send(result);
            }

            SubmissionCommand::CompleteUpload { timestamp, reply } => {
                let result = self.complete_upload(timestamp);
                let _ = reply.send(result);
            }

            SubmissionCommand::Shutdown => {
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    fn create(&mut self, timestamp: u64) -> Result<SubmissionEvent, EntityError> {
        if !self.state.is_empty() {
            return Err(EntityError::AlreadyExists);
        }
        self.persist_and_apply(SubmissionEvent::SubmissionCreated(Submission::created(
            timestamp,
        )))
    }

    fn modify(&mut self, record: Submission) -> Result<SubmissionEvent, EntityError> {
        if self.state.is_empty() {
            return Err(EntityError::NotCreated);
        }
        if !self.state.status.can_transition_to(record.status) {
            return Err(EntityError::InvalidTransition {
                from: self.state.status,
                to: record.status,
            });
        }
        self.persist_and_apply(SubmissionEvent::SubmissionModified(record))
    }

    fn start_upload(&mut self, _timestamp: u64) -> Result<SubmissionEvent, EntityError> {
        if self.state.status != SubmissionStatus::Created {
            return Err(EntityError::UploadNotAllowed {
                status: self.state.status,
            });
        }
        let record = self.state.with_status(SubmissionStatus::Uploading)?;
        self.persist_and_apply(SubmissionEvent::SubmissionModified(record))
    }

    fn complete_upload(&mut self, _timestamp: u64) -> Result<SubmissionEvent, EntityError> {
        if self.state.is_empty() {
            return Err(EntityError::NotCreated);
        }
        let record = self.state.with_status(SubmissionStatus::Uploaded)?;
        self.persist_and_apply(SubmissionEvent::SubmissionModified(record))
    }

    /// Persist an event, then fold it into the in-memory record.
    fn persist_and_apply(&mut self, event: SubmissionEvent) -> Result<SubmissionEvent, EntityError> {
        self.persist(event.clone())?;
        self.state = self.state.clone().apply(&event);
        self.maybe_snapshot();
        Ok(event)
    }

    fn persist(&mut self, event: SubmissionEvent) -> Result<(), EntityError> {
        self.last_seq = self.store.append(&self.key, &event)?;
        Ok(())
    }

    /// Best-effort snapshot so recovery replays only a bounded tail.
    fn maybe_snapshot(&self) {
        if self.last_seq == 0 || self.last_seq % SNAPSHOT_INTERVAL != 0 {
            return;
        }
        let snapshot = Snapshot {
            record: self.state.clone(),
            covered_seq: self.last_seq,
        };
        if let Err(e) = self.store.write_snapshot(&self.key, &snapshot) {
            warn!(
                subsystem = "df-02",
                id = %self.id,
                error = %e,
                "Snapshot write failed"
            );
        }
    }
}
