//! # Filing Events
//!
//! Defines the event types that flow through the shared bus, and the filter
//! subscribers use to select them.

use serde::{Deserialize, Serialize};
use shared_types::{Submission, SubmissionId};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FilingEvent {
    /// A submission's status changed. Carries the full record copy the
    /// coordinator computed; consumers needing certainty re-read the entity.
    SubmissionStatusUpdated {
        /// The submission the update is about.
        id: SubmissionId,
        /// The updated record copy.
        submission: Submission,
    },

    /// A raw-file upload finished ingesting.
    UploadCompleted {
        /// The submission the upload targeted.
        id: SubmissionId,
        /// Number of lines appended to the log.
        line_count: u64,
    },

    /// Critical error requiring operator attention.
    CriticalError {
        /// Originating component (e.g. "df-05").
        component: String,
        /// Error description.
        message: String,
    },
}

impl FilingEvent {
    /// Topic this event belongs to.
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::SubmissionStatusUpdated { .. } => EventTopic::Submission,
            Self::UploadCompleted { .. } => EventTopic::Upload,
            Self::CriticalError { .. } => EventTopic::Critical,
        }
    }

    /// Submission id the event concerns, if any.
    #[must_use]
    pub fn submission_id(&self) -> Option<&SubmissionId> {
        match self {
            Self::SubmissionStatusUpdated { id, .. } | Self::UploadCompleted { id, .. } => {
                Some(id)
            }
            Self::CriticalError { .. } => None,
        }
    }
}

/// Event categories subscribers can select on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTopic {
    /// Submission lifecycle updates.
    Submission,
    /// Upload progress events.
    Upload,
    /// Critical errors.
    Critical,
}

/// Filter describing which events a subscription receives.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to receive; empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Restrict to one submission id; `None` means all submissions.
    pub submission: Option<SubmissionId>,
}

impl EventFilter {
    /// Filter matching every event.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter matching the given topics only.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            submission: None,
        }
    }

    /// Filter matching events about one submission.
    #[must_use]
    pub fn submission(id: SubmissionId) -> Self {
        Self {
            topics: Vec::new(),
            submission: Some(id),
        }
    }

    /// Whether an event passes this filter.
    #[must_use]
    pub fn matches(&self, event: &FilingEvent) -> bool {
        if !self.topics.is_empty() && !self.topics.contains(&event.topic()) {
            return false;
        }
        match &self.submission {
            Some(id) => event.submission_id() == Some(id),
            None => true,
        }
    }
}
