//! Reduces noisy per-frame detection results to one trusted value.

pub mod majority;
pub mod occupancy;
pub mod window;

pub use majority::majority_vote;
pub use occupancy::{OccupancyCheck, OccupancyOutcome, OccupancyVerdict};
pub use window::SampleWindow;
