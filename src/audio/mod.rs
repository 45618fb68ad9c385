pub mod cue;
#[cfg(feature = "playback")]
pub mod engine;

#[cfg(feature = "playback")]
pub use engine::RodioAudio;

use crate::models::TrackHandle;

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),

    #[error("cannot play track: {0}")]
    Track(String),

    #[error("audio device error: {0}")]
    Device(String),
}

/// Audio output as the round controller sees it. Implementations must not block;
/// failures that only show up after a call returns are theirs to log.
pub trait AudioService: Send + Sync {
    fn play_track(&self, track: &TrackHandle) -> Result<(), AudioError>;
    fn pause(&self) -> Result<(), AudioError>;
    fn resume(&self) -> Result<(), AudioError>;
    fn play_cue(&self, cue_id: &str) -> Result<(), AudioError>;
    fn release(&self) -> Result<(), AudioError>;
}

/// Logs instead of playing; used when the crate is built without `playback`.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioService for NullAudio {
    fn play_track(&self, track: &TrackHandle) -> Result<(), AudioError> {
        log::info!("(silent) playing {}", track.as_str());
        Ok(())
    }

    fn pause(&self) -> Result<(), AudioError> {
        log::info!("(silent) pause");
        Ok(())
    }

    fn resume(&self) -> Result<(), AudioError> {
        log::info!("(silent) resume");
        Ok(())
    }

    fn play_cue(&self, cue_id: &str) -> Result<(), AudioError> {
        log::info!("(silent) cue {cue_id}");
        Ok(())
    }

    fn release(&self) -> Result<(), AudioError> {
        Ok(())
    }
}
