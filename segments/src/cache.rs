//! Caller-owned cache for batch scan results.
//!
//! A "best segments across all activities" scan is expensive, and the apps
//! that run it used to park the results in process-wide variables. The cache
//! here is explicit instead: the caller owns it, keys it with a fingerprint
//! of the activity set, and the whole entry is replaced whenever the set
//! changes. Results are never patched incrementally, so a stale partial
//! result cannot survive an activity being added or removed.

use std::hash::{DefaultHasher, Hash, Hasher};

/// Single-entry wholesale cache keyed by an activity-set fingerprint.
#[derive(Debug, Clone)]
pub struct ScanCache<T> {
    entry: Option<(u64, T)>,
}

impl<T> ScanCache<T> {
    pub const fn new() -> Self {
        Self { entry: None }
    }

    /// Cached value, only if it was produced for exactly this fingerprint.
    pub fn get(&self, fingerprint: u64) -> Option<&T> {
        match &self.entry {
            Some((key, value)) if *key == fingerprint => Some(value),
            _ => None,
        }
    }

    /// Replace the entry in full.
    pub fn store(&mut self, fingerprint: u64, value: T) {
        self.entry = Some((fingerprint, value));
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}

impl<T> Default for ScanCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fingerprint of an activity set, independent of iteration order.
///
/// Per-id digests are sorted before the final hash, so two sets with the
/// same ids always produce the same fingerprint no matter how the caller
/// stores them. The value is process-local and must not be persisted.
pub fn activity_fingerprint<I: Hash>(ids: impl IntoIterator<Item = I>) -> u64 {
    let mut digests = ids
        .into_iter()
        .map(|id| {
            let mut hasher = DefaultHasher::new();
            id.hash(&mut hasher);
            hasher.finish()
        })
        .collect::<Vec<_>>();

    digests.sort_unstable();

    let mut hasher = DefaultHasher::new();
    digests.hash(&mut hasher);
    hasher.finish()
}
