use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    #[default]
    Idle,
    ChairDetection,
    /// Manual-entry fallback; waits for the host to submit a chair count.
    AwaitingChairCount,
    CalibrationCountdown,
    Playing,
    PausedSettling,
    OccupancyCheck,
    MismatchPause,
    ResumeCountdown,
    /// Host paused the session or a collaborator went missing.
    Suspended,
    GameOver,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::ChairDetection => "ChairDetection",
            Phase::AwaitingChairCount => "AwaitingChairCount",
            Phase::CalibrationCountdown => "CalibrationCountdown",
            Phase::Playing => "Playing",
            Phase::PausedSettling => "PausedSettling",
            Phase::OccupancyCheck => "OccupancyCheck",
            Phase::MismatchPause => "MismatchPause",
            Phase::ResumeCountdown => "ResumeCountdown",
            Phase::Suspended => "Suspended",
            Phase::GameOver => "GameOver",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::GameOver)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque reference to a music track, interpreted by the audio collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct TrackHandle(String);

impl TrackHandle {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TrackHandle {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ChairSource {
    Consensus,
    Manual,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub phase: Phase,
    pub chair_count: u32,
    /// Snapshot of `chair_count` taken when the current occupancy window opened.
    pub expected_seated: Option<u32>,
    pub track: TrackHandle,
    pub using_front_camera: bool,
    pub round: u32,
    pub started_at: DateTime<Utc>,
    /// Phase that was interrupted when the session entered `Suspended`.
    pub suspended_from: Option<Phase>,
}

impl Session {
    pub fn new(id: String, track: TrackHandle, using_front_camera: bool) -> Self {
        Self {
            id,
            phase: Phase::Idle,
            chair_count: 0,
            expected_seated: None,
            track,
            using_front_camera,
            round: 0,
            started_at: Utc::now(),
            suspended_from: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: Option<String>,
    pub phase: Phase,
    pub chair_count: u32,
    pub expected_seated: Option<u32>,
    pub track: Option<TrackHandle>,
    pub using_front_camera: bool,
    pub round: u32,
    pub stop_armed: bool,
}
