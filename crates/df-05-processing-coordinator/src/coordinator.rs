//! # Processing Coordinator
//!
//! Reads current entity state, computes the new status/receipt, writes it
//! back, and notifies the manager.

use crate::errors::CoordinatorError;
use df_02_submission_entity::EntityRegistry;
use df_04_submission_manager::ManagerRegistry;
use shared_types::{Submission, SubmissionId, SubmissionStatus};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::error;

/// Coordinates entity state with the status broadcast.
pub struct ProcessingCoordinator {
    registry: Arc<EntityRegistry>,
    managers: Arc<ManagerRegistry>,
}

impl ProcessingCoordinator {
    /// Coordinator over the given ownership table and manager address table.
    #[must_use]
    pub fn new(registry: Arc<EntityRegistry>, managers: Arc<ManagerRegistry>) -> Arc<Self> {
        Arc::new(Self { registry, managers })
    }

    /// Broadcast a status change, detached.
    ///
    /// Fetches the current record; if the submission is absent (sentinel
    /// record), logs an error and stops: no further action, no error
    /// surfaced to any caller. Otherwise relays a copy with the new status
    /// to the manager, fire-and-forget. No durable write happens here.
    ///
    /// The returned handle exists for tests; production callers drop it.
    pub fn update_submission_status(
        self: &Arc<Self>,
        id: SubmissionId,
        new_status: SubmissionStatus,
    ) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let Some(record) = this.fetch(&id).await else {
                return;
            };

            let copy = match record.with_status(new_status) {
                Ok(copy) => copy,
                Err(e) => {
                    error!(
                        subsystem = "df-05",
                        id = %id,
                        error = %e,
                        "Status update dropped"
                    );
                    return;
                }
            };

            this.managers.manager(&id).notify_status(copy).await;
        })
    }

    /// Durably set receipt, end timestamp, and status, and broadcast, as
    /// two independent detached operations.
    ///
    /// The notification is not contingent on the durability write succeeding
    /// and vice versa; a consumer can observe the broadcast slightly before
    /// (or without ever seeing) the durable write land.
    pub fn update_submission_status_and_receipt(
        self: &Arc<Self>,
        id: SubmissionId,
        timestamp: u64,
        receipt: String,
        new_status: SubmissionStatus,
    ) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let Some(record) = this.fetch(&id).await else {
                return;
            };

            let copy = match record.with_receipt(receipt, timestamp).with_status(new_status) {
                Ok(copy) => copy,
                Err(e) => {
                    error!(
                        subsystem = "df-05",
                        id = %id,
                        error = %e,
                        "Status/receipt update dropped"
                    );
                    return;
                }
            };

            // Independent halves: broadcast...
            let notify = {
                let manager = this.managers.manager(&id);
                let notified = copy.clone();
                tokio::spawn(async move { manager.notify_status(notified).await })
            };

            // ...and durability.
            let durable = {
                let this = Arc::clone(&this);
                let id = id.clone();
                tokio::spawn(async move {
                    let entity = match this.registry.entity(&id) {
                        Ok(entity) => entity,
                        Err(e) => {
                            error!(
                                subsystem = "df-05",
                                id = %id,
                                error = %e,
                                "Receipt write failed to resolve entity"
                            );
                            return;
                        }
                    };
                    if let Err(e) = entity.modify_submission(copy).await {
                        error!(
                            subsystem = "df-05",
                            id = %id,
                            error = %e,
                            "Receipt write failed"
                        );
                    }
                })
            };

            let _ = notify.await;
            let _ = durable.await;
        })
    }

    /// Duplicate-submission guard: a new upload is only acceptable while the
    /// submission sits in its initial `Created` state.
    pub async fn verify_upload_allowed(&self, id: &SubmissionId) -> Result<(), CoordinatorError> {
        let entity = self.registry.entity(id)?;
        let record = entity.get_submission().await?;

        if record.is_empty() {
            return Err(CoordinatorError::NotFound { id: id.clone() });
        }
        if record.status != SubmissionStatus::Created {
            return Err(CoordinatorError::UploadNotAllowed {
                id: id.clone(),
                status: record.status,
            });
        }
        Ok(())
    }

    /// Fetch a record for a detached operation; absent submissions are the
    /// SilentInconsistency class: logged, never propagated.
    async fn fetch(&self, id: &SubmissionId) -> Option<Submission> {
        let entity = match self.registry.entity(id) {
            Ok(entity) => entity,
            Err(e) => {
                error!(
                    subsystem = "df-05",
                    id = %id,
                    error = %e,
                    "Coordinator could not resolve entity"
                );
                return None;
            }
        };

        let record = match entity.get_submission().await {
            Ok(record) => record,
            Err(e) => {
                error!(
                    subsystem = "df-05",
                    id = %id,
                    error = %e,
                    "Coordinator read failed"
                );
                return None;
            }
        };

        if record.is_empty() {
            error!(
                subsystem = "df-05",
                id = %id,
                "Coordinator addressed an absent submission"
            );
            return None;
        }

        Some(record)
    }
}
