//! Process-lifetime counter.
//!
//! The counter lives only as long as the server process. It starts at zero,
//! is reset on restart and is not shared between instances.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic in-memory counter owned by the application state.
#[derive(Debug, Default)]
pub struct ProcessCounter {
    value: AtomicU64,
}

impl ProcessCounter {
    /// Creates a counter starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
        }
    }

    /// Returns the current value.
    pub fn current(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }

    /// Increments the counter and returns the new value.
    pub fn increment(&self) -> u64 {
        self.value.fetch_add(1, Ordering::SeqCst).saturating_add(1)
    }
}
