//! # DF-05 Processing Coordinator
//!
//! Cross-cutting consistency operations across the submission entity and the
//! submission manager.
//!
//! ## Policy
//!
//! Status/receipt updates run detached from any HTTP request: nothing awaits
//! them, failures are logged at error severity and swallowed ("best effort,
//! log and move on"). The durability write and the broadcast notification
//! are independent asynchronous operations; a consumer may observe the
//! broadcast before, or without, the durable write landing. That is an
//! accepted trade-off of the design, not a bug.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod coordinator;
pub mod errors;

pub use coordinator::ProcessingCoordinator;
pub use errors::CoordinatorError;
