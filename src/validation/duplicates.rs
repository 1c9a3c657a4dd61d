//! Duplicate key detection for batch imports
//!
//! Candidate keys (device IDs, MAC addresses, ...) are checked against the keys
//! already stored and against the earlier rows of the same batch.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, warn};

use crate::algorithms::sorted_search::SortedKeys;

/// Why a candidate key was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicateReason {
    /// Key is already present among the existing keys
    AlreadyExists,
    /// Key was used by an earlier candidate in the same batch
    RepeatedInBatch,
}

impl fmt::Display for DuplicateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateReason::AlreadyExists => write!(f, "already exists"),
            DuplicateReason::RepeatedInBatch => write!(f, "repeated in batch"),
        }
    }
}

/// Result of screening a batch; both lists keep candidate order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchScreening<K> {
    pub accepted: Vec<K>,
    pub rejected: Vec<(K, DuplicateReason)>,
}

impl<K> BatchScreening<K> {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Screens candidate keys against a fixed set of existing keys
#[derive(Debug, Clone)]
pub struct DuplicateKeyFilter<K> {
    existing: SortedKeys<K>,
}

impl<K: Ord + Clone + fmt::Debug> DuplicateKeyFilter<K> {
    /// Sort the existing keys once; every screening reuses them
    pub fn new(existing: Vec<K>) -> Self {
        Self {
            existing: SortedKeys::new(existing),
        }
    }

    pub fn existing_count(&self) -> usize {
        self.existing.len()
    }

    pub fn is_duplicate(&self, key: &K) -> bool {
        self.existing.contains(key)
    }

    /// Partition `candidates` into accepted keys and rejected duplicates
    pub fn screen<I>(&self, candidates: I) -> BatchScreening<K>
    where
        I: IntoIterator<Item = K>,
    {
        let mut accepted: Vec<K> = Vec::new();
        let mut rejected = Vec::new();
        let mut seen: BTreeSet<K> = BTreeSet::new();

        for key in candidates {
            if self.existing.contains(&key) {
                warn!(key = ?key, "candidate key already exists");
                rejected.push((key, DuplicateReason::AlreadyExists));
            } else if seen.contains(&key) {
                warn!(key = ?key, "candidate key repeated in batch");
                rejected.push((key, DuplicateReason::RepeatedInBatch));
            } else {
                seen.insert(key.clone());
                accepted.push(key);
            }
        }

        debug!(
            existing = self.existing.len(),
            accepted = accepted.len(),
            rejected = rejected.len(),
            "screened import batch"
        );

        BatchScreening { accepted, rejected }
    }
}
