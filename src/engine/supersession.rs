use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};

#[derive(Debug, Default)]
struct Latest {
    generation: AtomicU64,
    fingerprint: AtomicU64,
}

/// Tracks the most recent request so that runs for older inputs can tell
/// they are stale.
#[derive(Debug, Clone, Default)]
pub struct SupersessionGuard {
    latest: Arc<Latest>,
}

impl SupersessionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a run for `fingerprint`, superseding runs for any other
    /// fingerprint.
    pub fn issue(&self, fingerprint: u64) -> RunTicket {
        self.latest.fingerprint.store(fingerprint, Ordering::SeqCst);
        let generation = self.latest.generation.fetch_add(1, Ordering::SeqCst) + 1;
        RunTicket {
            generation,
            fingerprint,
            latest: Arc::clone(&self.latest),
        }
    }

    /// Fingerprint of the most recently issued ticket.
    pub fn latest_fingerprint(&self) -> u64 {
        self.latest.fingerprint.load(Ordering::SeqCst)
    }

    pub fn generation(&self) -> u64 {
        self.latest.generation.load(Ordering::SeqCst)
    }
}

/// Permission to publish a result for one fingerprint.
#[derive(Debug, Clone)]
pub struct RunTicket {
    generation: u64,
    fingerprint: u64,
    latest: Arc<Latest>,
}

impl RunTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// A ticket stays current while no request with a different fingerprint
    /// has been issued after it.
    pub fn is_current(&self) -> bool {
        self.latest.fingerprint.load(Ordering::SeqCst) == self.fingerprint
    }

    pub fn check(&self) -> Result<()> {
        if self.is_current() {
            Ok(())
        } else {
            Err(Error::Superseded {
                latest: self.latest.fingerprint.load(Ordering::SeqCst),
            })
        }
    }
}
