//! Address table mapping submission ids to their relay instance.

use crate::manager::SubmissionManager;
use dashmap::DashMap;
use shared_bus::InMemoryEventBus;
use shared_types::SubmissionId;
use std::sync::Arc;

/// Get-or-create table of per-id managers.
///
/// Managers are stateless, so eviction is never required for correctness;
/// entries exist purely to give each id a stable address.
pub struct ManagerRegistry {
    bus: Arc<InMemoryEventBus>,
    managers: DashMap<SubmissionId, Arc<SubmissionManager>>,
}

impl ManagerRegistry {
    /// Registry publishing onto `bus`.
    #[must_use]
    pub fn new(bus: Arc<InMemoryEventBus>) -> Arc<Self> {
        Arc::new(Self {
            bus,
            managers: DashMap::new(),
        })
    }

    /// Resolve the manager addressing `id`.
    #[must_use]
    pub fn manager(&self, id: &SubmissionId) -> Arc<SubmissionManager> {
        self.managers
            .entry(id.clone())
            .or_insert_with(|| {
                Arc::new(SubmissionManager::new(id.clone(), self.bus.clone()))
            })
            .clone()
    }

    /// The bus managers publish onto.
    #[must_use]
    pub fn bus(&self) -> &Arc<InMemoryEventBus> {
        &self.bus
    }

    /// Number of instantiated managers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.managers.len()
    }

    /// Whether no manager has been instantiated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }
}
