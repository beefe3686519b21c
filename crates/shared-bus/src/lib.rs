//! # Shared Bus - Status Broadcast Between Subsystems
//!
//! In-memory broadcast bus carrying filing events (submission status
//! updates, upload completions, critical errors) from the submission manager
//! to whatever downstream supervisory or UI consumers are registered.
//!
//! ```text
//! ┌────────────────┐                    ┌────────────────┐
//! │ Submission Mgr │                    │   Subscriber   │
//! │                │    publish()       │                │
//! │                │ ──────┐            │                │
//! └────────────────┘       │            └────────────────┘
//!                          ▼                    ↑
//!                    ┌──────────────┐          │
//!                    │  Event Bus   │          │
//!                    │              │ ─────────┘
//!                    └──────────────┘  subscribe()
//! ```
//!
//! Delivery is at-most-once and unordered relative to durable writes: a
//! restart loses in-flight notifications, and consumers reconcile by reading
//! the entity's durable state directly.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, FilingEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lag kicks in.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(DEFAULT_CHANNEL_CAPACITY, 1000);
    }
}
