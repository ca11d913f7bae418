//! Time source for `oauth_timestamp` values.

use std::time::{SystemTime, UNIX_EPOCH};

/// Provides the current time as seconds since the Unix epoch.
///
/// The default [`SystemClock`] reads the wall clock; tests substitute a
/// fixed implementation so signatures become reproducible. Implementations
/// must be safe for concurrent use.
pub trait Clock: Send + Sync {
    fn epoch_seconds(&self) -> u64;
}

/// [`Clock`] backed by [`SystemTime::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn epoch_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Clock;

    /// Clock pinned to one instant; signatures become reproducible.
    pub(crate) struct FixedClock(pub u64);

    impl Clock for FixedClock {
        fn epoch_seconds(&self) -> u64 {
            self.0
        }
    }
}
