//! # DF-01 Event Log
//!
//! Append-only, per-entity ordered event logs.
//!
//! ## Purpose
//!
//! Every submission entity persists its state-changing facts here, one
//! strictly ordered log per entity key
//! (`Submission-<institution>-<period>-<seq>`). Current state is always a
//! left fold over the log from the empty record; recovery after deactivation
//! replays snapshot + tail.
//!
//! ## Module Structure
//!
//! ```text
//! df-01-event-log/
//! ├── store.rs    # EventStore port, Snapshot, errors
//! ├── memory.rs   # In-memory adapter (tests, light production)
//! ├── file.rs     # File-backed adapter (length-prefixed bincode frames)
//! ├── lock.rs     # Process-exclusive lock on the data directory
//! └── replay.rs   # Snapshot + tail recovery fold
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod file;
pub mod lock;
pub mod memory;
pub mod replay;
pub mod store;

pub use file::FileEventStore;
pub use lock::StoreLock;
pub use memory::MemoryEventStore;
pub use replay::{recover, Recovered};
pub use store::{EventLogError, EventStore, Snapshot, SNAPSHOT_INTERVAL};
