//! In-memory event store for tests and light production.

use crate::store::{EventLogError, EventStore, Snapshot};
use parking_lot::RwLock;
use shared_types::{SequencedEvent, SubmissionEvent};
use std::collections::HashMap;

/// In-memory implementation of the event store.
///
/// Logs live in a map of key -> ordered vector. Durability is process-scoped
/// only; production uses [`crate::FileEventStore`].
#[derive(Default)]
pub struct MemoryEventStore {
    logs: RwLock<HashMap<String, Vec<SubmissionEvent>>>,
    snapshots: RwLock<HashMap<String, Snapshot>>,
}

impl MemoryEventStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventStore for MemoryEventStore {
    fn append(&self, key: &str, event: &SubmissionEvent) -> Result<u64, EventLogError> {
        let mut logs = self.logs.write();
        let log = logs.entry(key.to_string()).or_default();
        log.push(event.clone());
        Ok(log.len() as u64)
    }

    fn read_from(&self, key: &str, from_seq: u64) -> Result<Vec<SequencedEvent>, EventLogError> {
        let logs = self.logs.read();
        let events = logs
            .get(key)
            .map(|log| {
                log.iter()
                    .enumerate()
                    .map(|(i, event)| SequencedEvent {
                        seq: i as u64 + 1,
                        event: event.clone(),
                    })
                    .filter(|e| e.seq >= from_seq)
                    .collect()
            })
            .unwrap_or_default();
        Ok(events)
    }

    fn event_count(&self, key: &str) -> Result<u64, EventLogError> {
        Ok(self.logs.read().get(key).map_or(0, |log| log.len() as u64))
    }

    fn latest_snapshot(&self, key: &str) -> Result<Option<Snapshot>, EventLogError> {
        Ok(self.snapshots.read().get(key).cloned())
    }

    fn write_snapshot(&self, key: &str, snapshot: &Snapshot) -> Result<(), EventLogError> {
        self.snapshots
            .write()
            .insert(key.to_string(), snapshot.clone());
        Ok(())
    }
}
