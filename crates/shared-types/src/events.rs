//! # Submission Events
//!
//! Persisted event kinds making up one submission's append-only log, and the
//! pure fold that reconstructs the current record from them.

use crate::submission::Submission;
use serde::{Deserialize, Serialize};

/// One state-changing fact in a submission's event log.
///
/// Entries are strictly ordered by append sequence within one entity's log;
/// no ordering exists across different entities' logs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionEvent {
    /// The submission came into existence. Carries the initial record so the
    /// replay fold stays deterministic.
    SubmissionCreated(Submission),
    /// The record was replaced with a new version.
    SubmissionModified(Submission),
    /// One raw line was ingested. Does not touch the record.
    LineAdded {
        /// Upload-wide timestamp (epoch millis), captured once per upload.
        timestamp: u64,
        /// The raw line, delimiter stripped.
        data: String,
    },
}

impl SubmissionEvent {
    /// Whether the event changes the submission record.
    #[must_use]
    pub fn modifies_record(&self) -> bool {
        !matches!(self, Self::LineAdded { .. })
    }
}

/// An event paired with its append sequence number (1-based).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencedEvent {
    /// Position in the entity's log, starting at 1.
    pub seq: u64,
    /// The persisted event.
    pub event: SubmissionEvent,
}

impl Submission {
    /// Pure left fold: apply one event to a record, producing the next.
    ///
    /// Replaying the full log from `Submission::default()` reconstructs the
    /// current state, independent of how the replay is batched.
    #[must_use]
    pub fn apply(self, event: &SubmissionEvent) -> Submission {
        match event {
            SubmissionEvent::SubmissionCreated(record)
            | SubmissionEvent::SubmissionModified(record) => record.clone(),
            SubmissionEvent::LineAdded { .. } => self,
        }
    }

    /// Fold a sequence of events onto a record.
    #[must_use]
    pub fn replay<'a, I>(self, events: I) -> Submission
    where
        I: IntoIterator<Item = &'a SubmissionEvent>,
    {
        events.into_iter().fold(self, |state, event| state.apply(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::SubmissionStatus;

    fn sample_log() -> Vec<SubmissionEvent> {
        let created = Submission::created(100);
        let uploading = created.with_status(SubmissionStatus::Uploading).unwrap();
        let uploaded = uploading.with_status(SubmissionStatus::Uploaded).unwrap();
        vec![
            SubmissionEvent::SubmissionCreated(created),
            SubmissionEvent::SubmissionModified(uploading),
            SubmissionEvent::LineAdded {
                timestamp: 200,
                data: "line one".into(),
            },
            SubmissionEvent::LineAdded {
                timestamp: 200,
                data: "line two".into(),
            },
            SubmissionEvent::SubmissionModified(uploaded),
        ]
    }

    #[test]
    fn test_replay_reconstructs_state() {
        let state = Submission::default().replay(&sample_log());
        assert_eq!(state.status, SubmissionStatus::Uploaded);
        assert_eq!(state.start, 100);
    }

    #[test]
    fn test_replay_batching_independent() {
        let log = sample_log();
        let full = Submission::default().replay(&log);
        let batched = Submission::default()
            .replay(&log[..2])
            .replay(&log[2..]);
        assert_eq!(full, batched);
    }

    #[test]
    fn test_line_added_does_not_touch_record() {
        let created = Submission::created(100);
        let state = created.clone().apply(&SubmissionEvent::LineAdded {
            timestamp: 1,
            data: "x".into(),
        });
        assert_eq!(state, created);
    }

    #[test]
    fn test_event_bincode_round_trip() {
        let event = SubmissionEvent::LineAdded {
            timestamp: 42,
            data: "ABC|123|foo".into(),
        };
        let bytes = bincode::serialize(&event).unwrap();
        let back: SubmissionEvent = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_modifies_record() {
        assert!(SubmissionEvent::SubmissionCreated(Submission::default()).modifies_record());
        assert!(!SubmissionEvent::LineAdded {
            timestamp: 0,
            data: String::new()
        }
        .modifies_record());
    }
}
