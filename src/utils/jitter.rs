//! Randomized pauses between poll cycles
//!
//! The pause is the only thing bounding how often the portal is hit, so it
//! runs after every non-terminal cycle, failed ones included.

use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// Inclusive range of whole seconds to sleep between cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepRange {
    pub min_secs: u64,
    pub max_secs: u64,
}

impl Default for SleepRange {
    fn default() -> Self {
        Self {
            min_secs: 45,
            max_secs: 180,
        }
    }
}

impl SleepRange {
    pub fn new(min_secs: u64, max_secs: u64) -> Self {
        Self { min_secs, max_secs }
    }

    /// Draw a duration uniformly from `[min_secs, max_secs]`
    ///
    /// A reversed range collapses to `min_secs`.
    pub fn sample(&self) -> Duration {
        self.sample_with(&mut rand::thread_rng())
    }

    pub fn sample_with<R: Rng>(&self, rng: &mut R) -> Duration {
        let secs = if self.max_secs <= self.min_secs {
            self.min_secs
        } else {
            rng.gen_range(self.min_secs..=self.max_secs)
        };
        Duration::from_secs(secs)
    }

    /// Sleep for a freshly sampled duration and return it
    pub async fn sleep(&self) -> Duration {
        let delay = self.sample();
        debug!(sleep_secs = delay.as_secs(), "Sleeping before next cycle");
        tokio::time::sleep(delay).await;
        delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_range() {
        let range = SleepRange::default();
        for _ in 0..1000 {
            let secs = range.sample().as_secs();
            assert!((45..=180).contains(&secs), "{secs} out of range");
        }
    }

    #[test]
    fn test_both_bounds_reachable() {
        let range = SleepRange::new(1, 2);
        let seen: std::collections::HashSet<u64> =
            (0..200).map(|_| range.sample().as_secs()).collect();
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_degenerate_range() {
        assert_eq!(SleepRange::new(0, 0).sample(), Duration::ZERO);
        assert_eq!(SleepRange::new(10, 3).sample(), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_zero_sleep_returns() {
        let slept = SleepRange::new(0, 0).sleep().await;
        assert_eq!(slept, Duration::ZERO);
    }

    proptest! {
        #[test]
        fn prop_sample_within_bounds(min in 0u64..500, span in 0u64..500) {
            let range = SleepRange::new(min, min + span);
            let secs = range.sample().as_secs();
            prop_assert!(secs >= min && secs <= min + span);
        }
    }
}
