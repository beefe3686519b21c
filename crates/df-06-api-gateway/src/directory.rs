//! # Institution Directory
//!
//! Collaborator boundary for institution/filing lookups and per-filing
//! sequence allocation. The gateway only needs existence answers and the
//! next sequence number; everything else about institutions is outside this
//! system.

use async_trait::async_trait;
use dashmap::DashMap;

/// Lookup port consumed by the gateway.
#[async_trait]
pub trait InstitutionDirectory: Send + Sync {
    /// Whether the institution is known.
    async fn institution_exists(&self, institution_id: &str) -> bool;

    /// Whether the institution has a filing for the period.
    async fn filing_exists(&self, institution_id: &str, period: &str) -> bool;

    /// Allocate the next submission sequence number for a filing.
    async fn next_sequence(&self, institution_id: &str, period: &str) -> u32;

    /// Latest allocated sequence for a filing (0 when none).
    async fn latest_sequence(&self, institution_id: &str, period: &str) -> u32;
}

/// In-memory directory adapter.
pub struct InMemoryInstitutionDirectory {
    institutions: DashMap<String, ()>,
    /// (institution, period) -> latest allocated sequence.
    filings: DashMap<(String, String), u32>,
}

impl Default for InMemoryInstitutionDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryInstitutionDirectory {
    /// Empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            institutions: DashMap::new(),
            filings: DashMap::new(),
        }
    }

    /// Register an institution.
    pub fn add_institution(&self, institution_id: impl Into<String>) {
        self.institutions.insert(institution_id.into(), ());
    }

    /// Open a filing period for an institution.
    pub fn add_filing(&self, institution_id: impl Into<String>, period: impl Into<String>) {
        self.filings
            .entry((institution_id.into(), period.into()))
            .or_insert(0);
    }
}

#[async_trait]
impl InstitutionDirectory for InMemoryInstitutionDirectory {
    async fn institution_exists(&self, institution_id: &str) -> bool {
        self.institutions.contains_key(institution_id)
    }

    async fn filing_exists(&self, institution_id: &str, period: &str) -> bool {
        self.filings
            .contains_key(&(institution_id.to_string(), period.to_string()))
    }

    async fn next_sequence(&self, institution_id: &str, period: &str) -> u32 {
        let mut entry = self
            .filings
            .entry((institution_id.to_string(), period.to_string()))
            .or_insert(0);
        *entry += 1;
        *entry
    }

    async fn latest_sequence(&self, institution_id: &str, period: &str) -> u32 {
        self.filings
            .get(&(institution_id.to_string(), period.to_string()))
            .map(|e| *e)
            .unwrap_or(0)
    }
}
