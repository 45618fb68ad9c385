//! Round controller and detection consensus engine for a musical chairs game:
//! music plays, stops at random, and a remote vision service confirms how many
//! chairs exist and how many players are seated.

pub mod audio;
pub mod camera;
pub mod consensus;
pub mod detection;
pub mod error;
pub mod game;
pub mod models;
pub mod settings;
pub mod timer;
pub mod utils;

pub use error::{GameError, GameResult, Resource};
pub use game::{Collaborators, GameEvent, ManualEntryReason, RoundController, SessionHandle};
pub use models::{Phase, SessionSnapshot, TrackHandle};
pub use settings::{GameSettings, RoundVariant, SettingsStore};
pub use utils::init_logging;
