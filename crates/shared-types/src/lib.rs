//! # Shared Types Crate
//!
//! This crate contains the domain entities shared across every filing
//! subsystem: submission identifiers, the submission record with its ordered
//! lifecycle statuses, and the persisted event kinds that make up a
//! submission's log.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Deterministic Replay**: Every fact needed to rebuild a record lives in
//!   the events themselves; replay never reads an ambient clock.
//! - **Sentinel Record**: `Submission::default()` stands for "no such
//!   submission yet"; no legitimate transition can return a record to it.

pub mod events;
pub mod submission;
pub mod time;

pub use events::{SequencedEvent, SubmissionEvent};
pub use submission::{
    Submission, SubmissionId, SubmissionStatus, TransitionError, ENTITY_KIND,
};
pub use time::{epoch_millis, SystemTimeSource, TimeSource};
