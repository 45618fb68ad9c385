pub mod sample;
pub mod session;

pub use sample::{DetectionSample, SampleKind};
pub use session::{ChairSource, Phase, Session, SessionSnapshot, TrackHandle};
