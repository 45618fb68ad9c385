use tokio::sync::{mpsc, oneshot};

use crate::error::{GameError, GameResult};
use crate::models::{SessionSnapshot, TrackHandle};

pub(crate) type Reply<T> = oneshot::Sender<GameResult<T>>;

pub(crate) enum Command {
    Start { track: TrackHandle, reply: Reply<()> },
    SubmitChairCount { count: u32, reply: Reply<()> },
    AcknowledgeMismatch { reply: Reply<()> },
    Pause { reply: Reply<()> },
    Resume { reply: Reply<()> },
    Teardown { reply: Reply<()> },
    SwitchCamera { reply: Reply<bool> },
    Snapshot { reply: Reply<SessionSnapshot> },
}

/// Host-facing entry points into a running round controller.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl SessionHandle {
    pub(crate) fn new(commands: mpsc::UnboundedSender<Command>) -> Self {
        Self { commands }
    }

    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> Command) -> GameResult<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .map_err(|_| GameError::ControllerClosed)?;
        response.await.map_err(|_| GameError::ControllerClosed)?
    }

    /// Commit to a round with the chosen track.
    pub async fn start_session(&self, track: TrackHandle) -> GameResult<()> {
        self.request(|reply| Command::Start { track, reply }).await
    }

    /// Answer a manual-entry request.
    pub async fn submit_chair_count(&self, count: u32) -> GameResult<()> {
        self.request(|reply| Command::SubmitChairCount { count, reply })
            .await
    }

    pub async fn acknowledge_mismatch(&self) -> GameResult<()> {
        self.request(|reply| Command::AcknowledgeMismatch { reply })
            .await
    }

    pub async fn pause_session(&self) -> GameResult<()> {
        self.request(|reply| Command::Pause { reply }).await
    }

    pub async fn resume_session(&self) -> GameResult<()> {
        self.request(|reply| Command::Resume { reply }).await
    }

    pub async fn teardown_session(&self) -> GameResult<()> {
        self.request(|reply| Command::Teardown { reply }).await
    }

    /// Toggle front/back camera; returns whether the front camera is now in use.
    pub async fn switch_camera(&self) -> GameResult<bool> {
        self.request(|reply| Command::SwitchCamera { reply }).await
    }

    pub async fn snapshot(&self) -> GameResult<SessionSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }
}
