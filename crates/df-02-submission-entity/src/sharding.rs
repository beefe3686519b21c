//! # Shard Assignment
//!
//! Deterministic assignment of submission ids to ownership partitions.
//! Callers address an id, never a partition; the assignment is the black box
//! behind that location transparency.

use sha2::{Digest, Sha256};
use shared_types::SubmissionId;

/// Simple modulo-based shard assignment over the entity log key.
///
/// Fast but causes many reassignments when the shard count changes; use
/// [`rendezvous_assign`] where reassignment cost matters.
#[must_use]
pub fn assign_shard(id: &SubmissionId, shard_count: u16) -> u16 {
    if shard_count == 0 {
        return 0;
    }

    let hash = sha256(id.log_key().as_bytes());
    let value = u16::from_be_bytes([hash[0], hash[1]]);
    value % shard_count
}

/// Rendezvous hashing for minimal reassignment.
///
/// When adding shard N, only 1/N ids move to the new shard. Also known as
/// "highest random weight" hashing.
#[must_use]
pub fn rendezvous_assign(id: &SubmissionId, shards: &[u16]) -> u16 {
    if shards.is_empty() {
        return 0;
    }

    if shards.len() == 1 {
        return shards[0];
    }

    let key = id.log_key();
    let mut input = Vec::with_capacity(key.len() + 2);
    input.extend_from_slice(key.as_bytes());
    input.extend_from_slice(&[0, 0]);

    let mut best_shard = shards[0];
    let mut best_hash = [0u8; 32];

    for shard in shards {
        let len = input.len();
        input[len - 2..].copy_from_slice(&shard.to_be_bytes());
        let combined = sha256(&input);

        if combined > best_hash {
            best_hash = combined;
            best_shard = *shard;
        }
    }

    best_shard
}

/// Helper: SHA-256 digest.
fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}
