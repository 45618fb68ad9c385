use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inclusive range, in whole seconds, that random music stops are drawn from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StopRange {
    pub min_secs: u64,
    pub max_secs: u64,
}

impl StopRange {
    pub fn new(min_secs: u64, max_secs: u64) -> Self {
        Self { min_secs, max_secs }
    }

    /// Draw a delay uniformly from the range. A zero-width range always yields `min_secs`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min_secs >= self.max_secs {
            return Duration::from_secs(self.min_secs.min(self.max_secs));
        }
        Duration::from_secs(rng.gen_range(self.min_secs..=self.max_secs))
    }
}
