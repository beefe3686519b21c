//! File-backed event store.
//!
//! One append-only file per log key under the data directory. Records are
//! length-prefixed bincode frames: `[len:u32 LE][payload]...`. Appends are
//! fsynced before the sequence is acknowledged; reads tolerate a truncated
//! final frame (a crash mid-append loses at most the unacknowledged event).

use crate::store::{EventLogError, EventStore, Snapshot};
use parking_lot::Mutex;
use shared_types::{SequencedEvent, SubmissionEvent};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Durable event store persisting each log to its own file.
pub struct FileEventStore {
    root: PathBuf,
    /// Cached event counts per key, filled lazily from disk.
    counts: Mutex<HashMap<String, u64>>,
}

impl FileEventStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, EventLogError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).map_err(EventLogError::io)?;
        Ok(Self {
            root,
            counts: Mutex::new(HashMap::new()),
        })
    }

    /// Data directory this store persists into.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn log_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.log", sanitize(key)))
    }

    fn snapshot_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.snap", sanitize(key)))
    }

    /// Scan a log file into frames, stopping at a truncated tail.
    fn load_events(path: &Path) -> Result<Vec<SubmissionEvent>, EventLogError> {
        let mut file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(EventLogError::io(e)),
        };

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(EventLogError::io)?;

        let mut events = Vec::new();
        let mut cursor = 0;

        while cursor + 4 <= bytes.len() {
            let len = u32::from_le_bytes(
                bytes[cursor..cursor + 4]
                    .try_into()
                    .map_err(EventLogError::codec)?,
            ) as usize;
            cursor += 4;

            if cursor + len > bytes.len() {
                // Truncated final frame from an interrupted append: tolerated.
                break;
            }

            let event: SubmissionEvent = bincode::deserialize(&bytes[cursor..cursor + len])
                .map_err(EventLogError::codec)?;
            events.push(event);
            cursor += len;
        }

        Ok(events)
    }

    fn current_count(&self, key: &str) -> Result<u64, EventLogError> {
        let mut counts = self.counts.lock();
        if let Some(count) = counts.get(key) {
            return Ok(*count);
        }
        let count = Self::load_events(&self.log_path(key))?.len() as u64;
        counts.insert(key.to_string(), count);
        Ok(count)
    }
}

impl EventStore for FileEventStore {
    fn append(&self, key: &str, event: &SubmissionEvent) -> Result<u64, EventLogError> {
        let payload = bincode::serialize(event).map_err(EventLogError::codec)?;
        let seq = self.current_count(key)? + 1;

        let mut frame = Vec::with_capacity(payload.len() + 4);
        frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        frame.extend_from_slice(&payload);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_path(key))
            .map_err(EventLogError::io)?;
        file.write_all(&frame).map_err(EventLogError::io)?;
        file.sync_all().map_err(EventLogError::io)?;

        self.counts.lock().insert(key.to_string(), seq);
        Ok(seq)
    }

    fn read_from(&self, key: &str, from_seq: u64) -> Result<Vec<SequencedEvent>, EventLogError> {
        let events = Self::load_events(&self.log_path(key))?;
        Ok(events
            .into_iter()
            .enumerate()
            .map(|(i, event)| SequencedEvent {
                seq: i as u64 + 1,
                event,
            })
            .filter(|e| e.seq >= from_seq)
            .collect())
    }

    fn event_count(&self, key: &str) -> Result<u64, EventLogError> {
        self.current_count(key)
    }

    fn latest_snapshot(&self, key: &str) -> Result<Option<Snapshot>, EventLogError> {
        let path = self.snapshot_path(key);
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(EventLogError::io(e)),
        };
        let snapshot = bincode::deserialize(&bytes).map_err(EventLogError::codec)?;
        Ok(Some(snapshot))
    }

    fn write_snapshot(&self, key: &str, snapshot: &Snapshot) -> Result<(), EventLogError> {
        let bytes = bincode::serialize(snapshot).map_err(EventLogError::codec)?;

        // Write atomically via temp file
        let path = self.snapshot_path(key);
        let temp_path = path.with_extension("snap.tmp");
        let mut file = File::create(&temp_path).map_err(EventLogError::io)?;
        file.write_all(&bytes).map_err(EventLogError::io)?;
        file.sync_all().map_err(EventLogError::io)?;
        std::fs::rename(&temp_path, &path).map_err(EventLogError::io)?;

        Ok(())
    }
}

/// Map a log key to a safe file stem.
fn sanitize(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
