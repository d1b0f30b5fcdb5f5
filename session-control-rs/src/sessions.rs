//! Process-wide active-session counter
//!
//! Incremented from concurrently handled requests, so updates go through an
//! atomic. The counter is a pure statistic with no ordering dependency on
//! other memory, hence `Relaxed`.

use std::sync::atomic::{AtomicU64, Ordering};

static ACTIVE_SESSIONS: AtomicU64 = AtomicU64::new(0);

/// Record one started session and return the new total
pub fn increment() -> u64 {
    ACTIVE_SESSIONS.fetch_add(1, Ordering::Relaxed) + 1
}

/// Current number of active sessions
pub fn active() -> u64 {
    ACTIVE_SESSIONS.load(Ordering::Relaxed)
}
