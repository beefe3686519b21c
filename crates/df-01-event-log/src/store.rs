//! # Event Store Port
//!
//! The outbound port entities persist through, plus the snapshot type used
//! for log-compacting recovery.

use serde::{Deserialize, Serialize};
use shared_types::{SequencedEvent, Submission, SubmissionEvent};
use thiserror::Error;

/// Write a snapshot after this many record-modifying events.
pub const SNAPSHOT_INTERVAL: u64 = 128;

/// Errors from event-log operations.
#[derive(Debug, Error, Clone)]
pub enum EventLogError {
    /// I/O failure reading or writing a log.
    #[error("event log I/O failure: {message}")]
    Io {
        /// Underlying I/O detail.
        message: String,
    },

    /// Event could not be encoded or decoded.
    #[error("event serialization failure: {message}")]
    Serialization {
        /// Codec detail.
        message: String,
    },

    /// The data directory is held by another process.
    #[error("event store already locked by process {pid:?}")]
    Locked {
        /// Pid holding the lock, when readable.
        pid: Option<u32>,
    },
}

impl EventLogError {
    pub(crate) fn io(e: impl std::fmt::Display) -> Self {
        Self::Io {
            message: e.to_string(),
        }
    }

    pub(crate) fn codec(e: impl std::fmt::Display) -> Self {
        Self::Serialization {
            message: e.to_string(),
        }
    }
}

/// Point-in-time record capture, so recovery replays only the log tail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The record as of `covered_seq`.
    pub record: Submission,
    /// Highest log sequence the snapshot covers.
    pub covered_seq: u64,
}

/// Append-only, per-key ordered event storage.
///
/// Implementations are shared across entities (`Arc<dyn EventStore>`), but
/// each key is only ever appended to by its single live entity, so per-key
/// append ordering equals command-arrival ordering.
pub trait EventStore: Send + Sync {
    /// Append one event to `key`'s log. Returns its 1-based sequence.
    fn append(&self, key: &str, event: &SubmissionEvent) -> Result<u64, EventLogError>;

    /// Read all events of `key` with sequence >= `from_seq`, in append order.
    fn read_from(&self, key: &str, from_seq: u64) -> Result<Vec<SequencedEvent>, EventLogError>;

    /// Number of events in `key`'s log.
    fn event_count(&self, key: &str) -> Result<u64, EventLogError>;

    /// Most recent snapshot for `key`, if any.
    fn latest_snapshot(&self, key: &str) -> Result<Option<Snapshot>, EventLogError>;

    /// Persist a snapshot for `key`, replacing any previous one.
    fn write_snapshot(&self, key: &str, snapshot: &Snapshot) -> Result<(), EventLogError>;
}
