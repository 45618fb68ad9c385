use crate::error::{GameError, GameResult};
use crate::models::{DetectionSample, SampleKind};

use super::majority::majority_vote;

/// Bounded buffer of chair-count samples for one sampling window.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    samples: Vec<DetectionSample>,
    capacity: usize,
    dropped: usize,
}

impl SampleWindow {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    /// Returns `false` when the window is already full.
    pub fn push(&mut self, sample: DetectionSample) -> bool {
        if self.samples.len() >= self.capacity {
            self.dropped += 1;
            return false;
        }
        self.samples.push(sample);
        true
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Consume the window into its majority chair count.
    pub fn decide(self) -> GameResult<u32> {
        let values: Vec<u32> = self
            .samples
            .iter()
            .filter_map(|sample| match sample.kind {
                SampleKind::ChairCount(value) => Some(value),
                SampleKind::SitStand(_) => None,
            })
            .collect();
        let usable = values.len();
        majority_vote(&values).map_err(|_| GameError::UndeterminedConsensus { samples: usable })
    }
}
