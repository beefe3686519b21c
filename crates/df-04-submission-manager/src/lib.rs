//! # DF-04 Submission Manager
//!
//! Stateless relay, one instance addressable per submission id, forwarding
//! status notifications to downstream subscribers on the shared bus.
//!
//! Delivery is at-most-once and unordered relative to the corresponding
//! durable write: the manager holds no durable state, a restart loses any
//! in-flight notification, and consumers re-derive status by reading the
//! entity directly. That is the accepted contract, not a defect.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod manager;
pub mod registry;

pub use manager::SubmissionManager;
pub use registry::ManagerRegistry;
