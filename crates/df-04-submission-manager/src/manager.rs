//! The per-submission relay.

use shared_bus::{EventPublisher, FilingEvent, InMemoryEventBus};
use shared_types::{Submission, SubmissionId};
use std::sync::Arc;
use tracing::debug;

/// Relay for one submission id.
///
/// `notify_*` calls are fire-and-forget publishes: they return once the
/// event is handed to the bus, without waiting for (or guaranteeing)
/// delivery to any subscriber.
pub struct SubmissionManager {
    id: SubmissionId,
    bus: Arc<InMemoryEventBus>,
}

impl SubmissionManager {
    /// Manager for `id` publishing onto `bus`.
    #[must_use]
    pub fn new(id: SubmissionId, bus: Arc<InMemoryEventBus>) -> Self {
        Self { id, bus }
    }

    /// The submission this manager relays for.
    #[must_use]
    pub fn id(&self) -> &SubmissionId {
        &self.id
    }

    /// Relay an `UpdateSubmissionStatus` notification.
    pub async fn notify_status(&self, submission: Submission) {
        let receivers = self
            .bus
            .publish(FilingEvent::SubmissionStatusUpdated {
                id: self.id.clone(),
                submission,
            })
            .await;
        debug!(
            subsystem = "df-04",
            id = %self.id,
            receivers,
            "Status notification relayed"
        );
    }

    /// Relay an upload-completion notification.
    pub async fn notify_upload_completed(&self, line_count: u64) {
        self.bus
            .publish(FilingEvent::UploadCompleted {
                id: self.id.clone(),
                line_count,
            })
            .await;
    }
}
