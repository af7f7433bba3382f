//! Monotonic millisecond clock used by the scheduler and the reconnect loop

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Milliseconds since an arbitrary start, as a wrapping 32-bit counter
///
/// The counter rolls over after about 49.7 days. Always compare two
/// timestamps with [`Millis::wrapping_since`], never with `<`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Millis(pub u32);

impl Millis {
    /// Milliseconds elapsed from `earlier` to `self`, rollover-safe
    pub fn wrapping_since(self, earlier: Millis) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    pub fn wrapping_add(self, ms: u32) -> Millis {
        Millis(self.0.wrapping_add(ms))
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Source of time and the only way the core waits
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current time
    fn now(&self) -> Millis;

    /// Suspends for `ms` milliseconds
    async fn sleep(&self, ms: u32);
}

/// Clock backed by the tokio timer
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Millis {
        // Truncation is the rollover.
        Millis(self.start.elapsed().as_millis() as u32)
    }

    async fn sleep(&self, ms: u32) {
        if ms == 0 {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(Duration::from_millis(u64::from(ms))).await;
        }
    }
}
