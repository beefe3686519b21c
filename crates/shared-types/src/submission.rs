//! # Submission Entities
//!
//! Core entities for the submission lifecycle: the composite submission id,
//! the ordered lifecycle statuses, and the mutable submission record owned by
//! its entity.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Entity-kind prefix used in per-entity log keys.
pub const ENTITY_KIND: &str = "Submission";

/// Composite, immutable key identifying one submission.
///
/// Two submissions with the same triple are the same entity; the triple is
/// both the cluster shard key and the event-log identifier suffix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId {
    /// Institution identifier (e.g. an LEI).
    pub institution_id: String,
    /// Filing period (e.g. "2019").
    pub period: String,
    /// Sequence number within the filing, starting at 1.
    pub sequence_number: u32,
}

impl SubmissionId {
    /// Create a new submission id.
    pub fn new(
        institution_id: impl Into<String>,
        period: impl Into<String>,
        sequence_number: u32,
    ) -> Self {
        Self {
            institution_id: institution_id.into(),
            period: period.into(),
            sequence_number,
        }
    }

    /// Stable per-entity log key: `Submission-<institution>-<period>-<seq>`.
    #[must_use]
    pub fn log_key(&self) -> String {
        format!("{}-{}", ENTITY_KIND, self)
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.institution_id, self.period, self.sequence_number
        )
    }
}

/// Ordered lifecycle states of a submission.
///
/// The numeric code defines the forward order; `Failed` is terminal and
/// reachable from any real state. `Unset` is the default sentinel standing
/// for "no such submission yet" and is never a transition target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    /// Default sentinel: the record does not exist yet.
    #[default]
    Unset,
    /// Submission created, no upload started.
    Created,
    /// Raw file upload in progress.
    Uploading,
    /// Raw file fully ingested.
    Uploaded,
    /// Edit checks running.
    Validating,
    /// Edit checks passed.
    Validated,
    /// Receipt issued, submission signed off.
    Signed,
    /// Terminal failure state.
    Failed,
}

impl SubmissionStatus {
    /// Numeric lifecycle code; greater means further along.
    #[must_use]
    pub fn code(&self) -> u8 {
        match self {
            Self::Unset => 0,
            Self::Created => 1,
            Self::Uploading => 2,
            Self::Uploaded => 3,
            Self::Validating => 4,
            Self::Validated => 5,
            Self::Signed => 6,
            Self::Failed => 255,
        }
    }

    /// Whether a record in `self` may be rewritten to `next`.
    ///
    /// Transitions are monotonic: the code never decreases and never returns
    /// to `Unset`. Equal-code rewrites are legal because the coordinator
    /// re-writes the current status carrying receipt fields.
    #[must_use]
    pub fn can_transition_to(&self, next: SubmissionStatus) -> bool {
        next != Self::Unset && next.code() >= self.code()
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Rejected status transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid status transition: {from} -> {to}")]
pub struct TransitionError {
    /// Status before the rejected transition.
    pub from: SubmissionStatus,
    /// Requested target status.
    pub to: SubmissionStatus,
}

/// Mutable record owned exclusively by a submission entity.
///
/// `receipt` stays empty until the ingestion-complete phase; `start`/`end`
/// are epoch milliseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Current lifecycle status.
    pub status: SubmissionStatus,
    /// Receipt string, empty until issued.
    pub receipt: String,
    /// Creation timestamp (epoch millis).
    pub start: u64,
    /// Completion timestamp (epoch millis), 0 until set.
    pub end: u64,
}

impl Submission {
    /// Record for a freshly created submission.
    #[must_use]
    pub fn created(timestamp: u64) -> Self {
        Self {
            status: SubmissionStatus::Created,
            receipt: String::new(),
            start: timestamp,
            end: 0,
        }
    }

    /// Whether this is the default sentinel record ("no such submission").
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Copy with a new status, validating the monotonic transition rule.
    pub fn with_status(&self, status: SubmissionStatus) -> Result<Self, TransitionError> {
        if !self.status.can_transition_to(status) {
            return Err(TransitionError {
                from: self.status,
                to: status,
            });
        }
        let mut next = self.clone();
        next.status = status;
        Ok(next)
    }

    /// Copy with receipt and end timestamp set.
    #[must_use]
    pub fn with_receipt(&self, receipt: impl Into<String>, end: u64) -> Self {
        let mut next = self.clone();
        next.receipt = receipt.into();
        next.end = end;
        next
    }
}
