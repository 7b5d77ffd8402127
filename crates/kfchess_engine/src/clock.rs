//! Engine time sources
//!
//! State machines never read the wall clock themselves; callers pass `now`
//! from a [`Clock`]. The runtime uses [`SystemClock`], tests drive a
//! [`ManualClock`] by hand.

use crate::types::Millis;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use web_time::Instant;

pub trait Clock: Send + Sync {
    /// Monotonic milliseconds since the clock was created
    fn now(&self) -> Millis;
}

/// Monotonic clock backed by `web_time::Instant`
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }
}

/// Hand-driven clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start: Millis) -> Self {
        Self {
            millis: Arc::new(AtomicU64::new(start)),
        }
    }

    pub fn advance(&self, by: Millis) {
        self.millis.fetch_add(by, Ordering::SeqCst);
    }

    pub fn set(&self, to: Millis) {
        self.millis.store(to, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        self.millis.load(Ordering::SeqCst)
    }
}
