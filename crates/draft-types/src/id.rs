use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Identifier for a canvas object.
///
/// Allocated from a process-wide monotonic counter; never reused within a
/// process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl ObjectId {
    /// Allocate the next identifier from the global counter.
    pub fn next() -> Self {
        ObjectId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reseed the global id counter.
///
/// Only meaningful at full process start (or between isolated tests); ids
/// handed out before the reset must no longer be live.
pub fn reset_id_counter(seed: u64) {
    NEXT_ID.store(seed.max(1), Ordering::Relaxed);
}

/// Move the counter past `id` if it is not already. Loading a persisted
/// drawing calls this with the highest id it saw, so fresh allocations never
/// collide with restored objects.
pub fn bump_id_counter_past(id: u64) {
    NEXT_ID.fetch_max(id + 1, Ordering::Relaxed);
}
