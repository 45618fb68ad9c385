pub mod controller;
pub mod events;
pub mod handle;
pub mod transitions;

pub use controller::{Collaborators, RoundController};
pub use events::{GameEvent, ManualEntryReason};
pub use handle::SessionHandle;
