use std::collections::HashMap;
use std::sync::Mutex;

use crate::sim::shadow::ComplianceResult;

/// Storage for finished results, keyed by request fingerprint.
///
/// Injected into the engine so callers decide whether and how results are
/// kept.
pub trait ResultCache: Send + Sync {
    fn get(&self, fingerprint: u64) -> Option<ComplianceResult>;
    fn put(&self, fingerprint: u64, result: ComplianceResult);
    /// Drops every entry except the one for `fingerprint`.
    fn retain_only(&self, fingerprint: u64);
    fn clear(&self);
}

/// Cache that never stores anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl ResultCache for NoCache {
    fn get(&self, _fingerprint: u64) -> Option<ComplianceResult> {
        None
    }

    fn put(&self, _fingerprint: u64, _result: ComplianceResult) {}

    fn retain_only(&self, _fingerprint: u64) {}

    fn clear(&self) {}
}

/// Process-lifetime cache in a hash map.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<u64, ComplianceResult>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<u64, ComplianceResult>> {
        // A panic while holding the lock leaves the map itself intact
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ResultCache for InMemoryCache {
    fn get(&self, fingerprint: u64) -> Option<ComplianceResult> {
        self.lock().get(&fingerprint).cloned()
    }

    fn put(&self, fingerprint: u64, result: ComplianceResult) {
        self.lock().insert(fingerprint, result);
    }

    fn retain_only(&self, fingerprint: u64) {
        self.lock().retain(|&k, _| k == fingerprint);
    }

    fn clear(&self) {
        self.lock().clear();
    }
}
