//! Coordinator errors surfaced to request-path callers.
//!
//! Only the duplicate-upload guard runs inside a request; the detached
//! update operations never surface errors anywhere (they log instead).

use df_02_submission_entity::EntityError;
use shared_types::{SubmissionId, SubmissionStatus};
use thiserror::Error;

/// Failures from coordinator request-path operations.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// No submission exists under this id (sentinel record).
    #[error("submission {id} not found")]
    NotFound {
        /// The missing submission.
        id: SubmissionId,
    },

    /// Upload requested while the submission is past its initial state.
    #[error("submission {id} is {status}, uploads require Created")]
    UploadNotAllowed {
        /// The conflicting submission.
        id: SubmissionId,
        /// Its current status.
        status: SubmissionStatus,
    },

    /// The underlying entity call failed (timeout, deactivation, ...).
    #[error(transparent)]
    Entity(#[from] EntityError),
}
