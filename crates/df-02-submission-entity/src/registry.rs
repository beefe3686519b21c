//! # Entity Registry
//!
//! Partitioned ownership table mapping submission ids to their single live
//! entity. Activation is lazy (first command to a fresh id spawns and
//! replays), exclusivity is per-partition map entry, and passivated entries
//! are re-activated transparently on next use.

use crate::command::EntityError;
use crate::entity::EntityRuntime;
use crate::handle::EntityHandle;
use crate::sharding::assign_shard;
use dashmap::DashMap;
use df_01_event_log::EventStore;
use shared_types::SubmissionId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Tuning knobs for entity activation.
#[derive(Clone, Debug)]
pub struct EntityRegistryConfig {
    /// Number of ownership partitions.
    pub shard_count: u16,
    /// Mailbox depth per entity; the backpressure bound for uploads.
    pub mailbox_capacity: usize,
    /// Idle time after which a live entity passivates.
    pub idle_timeout: Duration,
    /// Deadline for request/response calls through handles.
    pub ask_timeout: Duration,
}

impl Default for EntityRegistryConfig {
    fn default() -> Self {
        Self {
            shard_count: 16,
            mailbox_capacity: 64,
            idle_timeout: Duration::from_secs(300),
            ask_timeout: Duration::from_secs(5),
        }
    }
}

impl EntityRegistryConfig {
    /// Small, fast-cycling config for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            shard_count: 4,
            mailbox_capacity: 8,
            idle_timeout: Duration::from_secs(5),
            ask_timeout: Duration::from_millis(500),
        }
    }
}

/// The ownership table: one live entity per id, cluster-wide.
pub struct EntityRegistry {
    partitions: Vec<Arc<DashMap<SubmissionId, EntityHandle>>>,
    store: Arc<dyn EventStore>,
    config: EntityRegistryConfig,
    generations: AtomicU64,
}

impl EntityRegistry {
    /// Create a registry over the given event store.
    #[must_use]
    pub fn new(store: Arc<dyn EventStore>, config: EntityRegistryConfig) -> Arc<Self> {
        let partitions = (0..config.shard_count.max(1))
            .map(|_| Arc::new(DashMap::new()))
            .collect();
        Arc::new(Self {
            partitions,
            store,
            config,
            generations: AtomicU64::new(0),
        })
    }

    fn partition(&self, id: &SubmissionId) -> &Arc<DashMap<SubmissionId, EntityHandle>> {
        let shard = assign_shard(id, self.partitions.len() as u16);
        &self.partitions[shard as usize]
    }

    /// Resolve the live handle for `id`, activating (and replaying) the
    /// entity if it is not currently live. A passivated-but-still-mapped
    /// entry is replaced.
    pub fn entity(&self, id: &SubmissionId) -> Result<EntityHandle, EntityError> {
        let partition = self.partition(id);

        if let Some(existing) = partition.get(id) {
            if existing.value().is_live() {
                return Ok(existing.value().clone());
            }
        }

        // Entry-level exclusivity: only one caller activates.
        let mut entry = partition.entry(id.clone()).or_try_insert_with(|| {
            debug!(subsystem = "df-02", id = %id, "Activating entity");
            self.spawn(id, partition)
        })?;

        if !entry.value().is_live() {
            // Passivated between lookup and entry: replace in place.
            *entry.value_mut() = self.spawn(id, partition)?;
        }

        Ok(entry.value().clone())
    }

    fn spawn(
        &self,
        id: &SubmissionId,
        partition: &Arc<DashMap<SubmissionId, EntityHandle>>,
    ) -> Result<EntityHandle, EntityError> {
        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
        EntityRuntime::spawn(
            id.clone(),
            self.store.clone(),
            partition.clone(),
            generation,
            self.config.mailbox_capacity,
            self.config.idle_timeout,
            self.config.ask_timeout,
        )
    }

    /// Number of currently live entities across all partitions.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.partitions
            .iter()
            .map(|p| p.iter().filter(|e| e.value().is_live()).count())
            .sum()
    }

    /// Request graceful shutdown of every live entity.
    pub async fn shutdown_all(&self) {
        for partition in &self.partitions {
            let handles: Vec<EntityHandle> =
                partition.iter().map(|e| e.value().clone()).collect();
            for handle in handles {
                handle.shutdown().await;
            }
        }
    }
}
