// src/watch/baseline.rs

use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

/// The last instant at which the watcher knows it is in sync with disk.
///
/// Only files modified strictly after this instant count as changes. The
/// value never moves backwards.
#[derive(Debug)]
pub struct Baseline {
    at: Mutex<SystemTime>,
}

impl Baseline {
    pub fn new(at: SystemTime) -> Self {
        Self { at: Mutex::new(at) }
    }

    /// Baseline starting at the current wall-clock time.
    pub fn starting_now() -> Self {
        Self::new(SystemTime::now())
    }

    pub fn get(&self) -> SystemTime {
        *self.at.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// True if `modified` is strictly after the baseline.
    pub fn is_stale_against(&self, modified: SystemTime) -> bool {
        modified > self.get()
    }

    /// Move the baseline forward to `to`; earlier instants are ignored.
    ///
    /// Returns the baseline after the call.
    pub fn advance_to(&self, to: SystemTime) -> SystemTime {
        let mut at = self.at.lock().unwrap_or_else(PoisonError::into_inner);
        if to > *at {
            *at = to;
        }
        *at
    }
}

impl Default for Baseline {
    fn default() -> Self {
        Self::starting_now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn only_strictly_newer_times_are_stale() {
        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let baseline = Baseline::new(t0);
        assert!(!baseline.is_stale_against(t0));
        assert!(!baseline.is_stale_against(t0 - Duration::from_millis(1)));
        assert!(baseline.is_stale_against(t0 + Duration::from_millis(1)));
    }

    #[test]
    fn never_moves_backwards() {
        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let baseline = Baseline::new(t0);
        assert_eq!(baseline.advance_to(t0 - Duration::from_secs(5)), t0);
        let later = t0 + Duration::from_secs(5);
        assert_eq!(baseline.advance_to(later), later);
        assert_eq!(baseline.get(), later);
    }
}
