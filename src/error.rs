use serde::{Deserialize, Serialize};

use crate::models::Phase;

/// Collaborators whose absence halts automatic progress.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    Camera,
    Audio,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::Camera => f.write_str("camera"),
            Resource::Audio => f.write_str("audio"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("no chair count consensus from {samples} usable samples")]
    UndeterminedConsensus { samples: usize },

    #[error("{resource} unavailable: {message}")]
    ResourceUnavailable { resource: Resource, message: String },

    #[error("`{command}` is not valid while {phase:?}")]
    InvalidCommand { command: &'static str, phase: Phase },

    #[error("illegal phase change {from:?} -> {to:?}")]
    IllegalTransition { from: Phase, to: Phase },

    #[error("chair count must be at least one")]
    InvalidChairCount,

    #[error("round controller is no longer running")]
    ControllerClosed,
}

pub type GameResult<T> = Result<T, GameError>;
