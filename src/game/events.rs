use serde::Serialize;

use crate::error::Resource;
use crate::models::{ChairSource, DetectionSample, Phase};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ManualEntryReason {
    Offline,
    Undetermined,
    ZeroDetected,
}

/// Everything the host UI needs to render, pushed as it happens.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GameEvent {
    PhaseChanged { from: Phase, to: Phase },
    Countdown { phase: Phase, remaining_secs: u64 },
    SampleRecorded { sample: DetectionSample },
    ChairCountDecided { count: u32, source: ChairSource },
    ManualEntryRequested { reason: ManualEntryReason },
    StopScheduled { delay_ms: u64 },
    MusicStopped { round: u32 },
    MismatchDetected { expected: u32, detected: u32 },
    OccupancyConfirmed { expected: u32 },
    ChairRemoved { remaining: u32 },
    ResourceUnavailable { resource: Resource, message: String },
    GameOver { rounds: u32 },
    SessionEnded { session_id: String },
}
