//! # Command Protocol
//!
//! Commands accepted by a submission entity, and the typed failures the
//! entity returns to its immediate caller. Failures are never retried by the
//! entity itself; retry policy belongs to the caller.

use df_01_event_log::EventLogError;
use shared_types::{Submission, SubmissionEvent, SubmissionStatus, TransitionError};
use thiserror::Error;
use tokio::sync::oneshot;

/// Reply channel carrying the resulting event as acknowledgment.
pub type EventReply = oneshot::Sender<Result<SubmissionEvent, EntityError>>;

/// Commands accepted by a submission entity.
///
/// Delivered over a bounded FIFO mailbox; processing order equals arrival
/// order.
#[derive(Debug)]
pub enum SubmissionCommand {
    /// Return the current in-memory record; no side effect.
    GetSubmission {
        /// Reply with the current record.
        reply: oneshot::Sender<Submission>,
    },

    /// Bring a fresh submission into existence.
    CreateSubmission {
        /// Creation time, epoch millis.
        timestamp: u64,
        /// Resulting `SubmissionCreated` event, or a conflict.
        reply: EventReply,
    },

    /// Validate and replace the record.
    ModifySubmission {
        /// The replacement record.
        record: Submission,
        /// Resulting `SubmissionModified` event, or a typed failure.
        reply: EventReply,
    },

    /// Append one raw line. Fire-and-forget: no reply channel; the bounded
    /// mailbox itself provides the backpressure.
    AddLine {
        /// Upload-wide timestamp, epoch millis.
        timestamp: u64,
        /// The raw line.
        data: String,
    },

    /// Mark the record `Uploading`; only legal from `Created`.
    StartUpload {
        /// Upload start time, epoch millis.
        timestamp: u64,
        /// Resulting `SubmissionModified` event, or a conflict.
        reply: EventReply,
    },

    /// Mark the record `Uploaded` after the last line was durably accepted.
    CompleteUpload {
        /// Upload timestamp, epoch millis.
        timestamp: u64,
        /// Resulting `SubmissionModified` event, or a typed failure.
        reply: EventReply,
    },

    /// Request graceful deactivation after draining pending commands.
    Shutdown,
}

/// Typed failures returned by a submission entity.
#[derive(Debug, Error, Clone)]
pub enum EntityError {
    /// The requested status change would move the lifecycle backwards.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        /// Status before the rejected transition.
        from: SubmissionStatus,
        /// Requested target status.
        to: SubmissionStatus,
    },

    /// `CreateSubmission` on an id that already exists.
    #[error("submission already exists")]
    AlreadyExists,

    /// Command requires an existing submission, but the record is the
    /// empty sentinel.
    #[error("submission does not exist")]
    NotCreated,

    /// Upload start requires status `Created`.
    #[error("upload not allowed while status is {status}")]
    UploadNotAllowed {
        /// The status that blocked the upload.
        status: SubmissionStatus,
    },

    /// The event could not be persisted; the command was not applied.
    #[error("persistence failure: {0}")]
    Persistence(#[from] EventLogError),

    /// The entity is mid-shutdown or passivated; transient, the caller may
    /// retry against a fresh activation.
    #[error("entity deactivated")]
    Deactivated,

    /// A request/response call exceeded its deadline. Not retried here.
    #[error("entity request timed out: {operation}")]
    Timeout {
        /// The operation that timed out.
        operation: &'static str,
    },
}

impl From<TransitionError> for EntityError {
    fn from(err: TransitionError) -> Self {
        Self::InvalidTransition {
            from: err.from,
            to: err.to,
        }
    }
}
