use std::sync::Arc;

use anyhow::Result;
use rand::{rngs::StdRng, SeedableRng};
use tokio::{sync::mpsc, task::JoinHandle};
use uuid::Uuid;

use super::events::{GameEvent, ManualEntryReason};
use super::handle::{Command, SessionHandle};
use super::transitions;
use crate::audio::AudioService;
use crate::camera::CameraService;
use crate::consensus::{OccupancyCheck, OccupancyOutcome, OccupancyVerdict, SampleWindow};
use crate::detection::{ConnectivityProbe, DetectionClient, DetectionError};
use crate::error::{GameError, GameResult, Resource};
use crate::models::{ChairSource, DetectionSample, Phase, Session, SessionSnapshot, TrackHandle};
use crate::settings::GameSettings;
use crate::timer::{DelayHandle, Scheduler, Tick, TimerId, WindowHandle, WindowSpec};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

pub type EventStream = mpsc::UnboundedReceiver<GameEvent>;

/// External services the controller drives.
#[derive(Clone)]
pub struct Collaborators {
    pub audio: Arc<dyn AudioService>,
    pub camera: Arc<dyn CameraService>,
    pub detector: Arc<dyn DetectionClient>,
    pub connectivity: Arc<dyn ConnectivityProbe>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Chairs,
    Seated,
}

/// Scheduler and background-task notifications, funnelled back into the controller loop.
enum Internal {
    Tick {
        timer: TimerId,
        tick: Tick,
    },
    WindowDone {
        timer: TimerId,
    },
    DelayElapsed {
        timer: TimerId,
    },
    Sample {
        timer: TimerId,
        probe: Probe,
        result: Result<u32, DetectionError>,
    },
}

enum ActiveWindow {
    Chairs {
        handle: WindowHandle,
        samples: SampleWindow,
    },
    Occupancy {
        handle: WindowHandle,
        check: OccupancyCheck,
    },
    Countdown {
        handle: WindowHandle,
        phase: Phase,
    },
}

impl ActiveWindow {
    fn handle(&self) -> &WindowHandle {
        match self {
            ActiveWindow::Chairs { handle, .. }
            | ActiveWindow::Occupancy { handle, .. }
            | ActiveWindow::Countdown { handle, .. } => handle,
        }
    }

    fn owns(&self, timer: TimerId) -> bool {
        let handle = self.handle();
        handle.id() == timer && !handle.is_cancelled()
    }
}

enum PendingDelay {
    Stop(DelayHandle),
    Settle(DelayHandle),
}

impl PendingDelay {
    fn handle(&self) -> &DelayHandle {
        match self {
            PendingDelay::Stop(handle) | PendingDelay::Settle(handle) => handle,
        }
    }
}

/// The round state machine. Runs as a single task that owns every piece of
/// mutable game state; timers and detection requests only send it messages.
pub struct RoundController {
    settings: GameSettings,
    collaborators: Collaborators,
    scheduler: Scheduler,
    rng: StdRng,
    phase: Phase,
    session: Option<Session>,
    using_front_camera: bool,
    track_started: bool,
    window: Option<ActiveWindow>,
    delay: Option<PendingDelay>,
    /// Prompt the host must answer; re-sent when the session resumes into it.
    pending_prompt: Option<GameEvent>,
    events: mpsc::UnboundedSender<GameEvent>,
    internal_tx: mpsc::UnboundedSender<Internal>,
}

impl RoundController {
    pub fn spawn(
        settings: GameSettings,
        collaborators: Collaborators,
    ) -> Result<(SessionHandle, EventStream, JoinHandle<()>)> {
        Self::spawn_with_rng(settings, collaborators, StdRng::from_entropy())
    }

    /// Same as [`RoundController::spawn`] with a reproducible stop schedule.
    pub fn spawn_seeded(
        settings: GameSettings,
        collaborators: Collaborators,
        seed: u64,
    ) -> Result<(SessionHandle, EventStream, JoinHandle<()>)> {
        Self::spawn_with_rng(settings, collaborators, StdRng::seed_from_u64(seed))
    }

    fn spawn_with_rng(
        settings: GameSettings,
        collaborators: Collaborators,
        rng: StdRng,
    ) -> Result<(SessionHandle, EventStream, JoinHandle<()>)> {
        settings.validate()?;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();

        let controller = Self {
            settings,
            collaborators,
            scheduler: Scheduler::new(),
            rng,
            phase: Phase::Idle,
            session: None,
            using_front_camera: true,
            track_started: false,
            window: None,
            delay: None,
            pending_prompt: None,
            events: event_tx,
            internal_tx,
        };

        let task = tokio::spawn(controller.run(command_rx, internal_rx));
        Ok((SessionHandle::new(command_tx), event_rx, task))
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut internal: mpsc::UnboundedReceiver<Internal>,
    ) {
        loop {
            tokio::select! {
                biased;
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => break,
                },
                Some(message) = internal.recv() => {
                    if let Err(err) = self.handle_internal(message) {
                        log_error!("round controller in {} failed: {err}", self.phase);
                    }
                }
            }
        }

        log_info!("round controller shutting down");
        self.cancel_timers();
        if self.session.is_some() {
            if let Err(err) = self.collaborators.audio.release() {
                log_warn!("audio release failed: {err}");
            }
        }
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Start { track, reply } => {
                let _ = reply.send(self.start_session(track).await);
            }
            Command::SubmitChairCount { count, reply } => {
                let _ = reply.send(self.submit_chair_count(count));
            }
            Command::AcknowledgeMismatch { reply } => {
                let _ = reply.send(self.acknowledge_mismatch());
            }
            Command::Pause { reply } => {
                let _ = reply.send(self.pause_session());
            }
            Command::Resume { reply } => {
                let _ = reply.send(self.resume_session());
            }
            Command::Teardown { reply } => {
                let _ = reply.send(self.teardown_session());
            }
            Command::SwitchCamera { reply } => {
                let _ = reply.send(Ok(self.switch_camera()));
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(Ok(self.snapshot()));
            }
        }
    }

    fn handle_internal(&mut self, message: Internal) -> GameResult<()> {
        match message {
            Internal::Tick { timer, tick } => self.on_tick(timer, tick),
            Internal::WindowDone { timer } => self.on_window_done(timer),
            Internal::DelayElapsed { timer } => self.on_delay(timer),
            Internal::Sample {
                timer,
                probe,
                result,
            } => self.on_sample(timer, probe, result),
        }
    }

    // ---- host commands -------------------------------------------------

    async fn start_session(&mut self, track: TrackHandle) -> GameResult<()> {
        if self.session.is_some() && !self.phase.is_terminal() {
            return Err(GameError::InvalidCommand {
                command: "start_session",
                phase: self.phase,
            });
        }

        self.cancel_timers();
        self.pending_prompt = None;
        self.track_started = false;
        self.phase = Phase::Idle;

        let session = Session::new(Uuid::new_v4().to_string(), track, self.using_front_camera);
        log_info!(
            "session {} starting with track {}",
            session.id,
            session.track.as_str()
        );
        self.session = Some(session);

        if self.collaborators.connectivity.is_online().await {
            self.start_chair_detection()
        } else {
            self.request_manual_entry(ManualEntryReason::Offline)
        }
    }

    fn submit_chair_count(&mut self, count: u32) -> GameResult<()> {
        if self.phase != Phase::AwaitingChairCount {
            return Err(GameError::InvalidCommand {
                command: "submit_chair_count",
                phase: self.phase,
            });
        }
        if count == 0 {
            return Err(GameError::InvalidChairCount);
        }

        self.pending_prompt = None;
        self.set_chair_count(count, ChairSource::Manual);
        self.start_calibration()
    }

    fn acknowledge_mismatch(&mut self) -> GameResult<()> {
        if self.phase != Phase::MismatchPause {
            return Err(GameError::InvalidCommand {
                command: "acknowledge_mismatch",
                phase: self.phase,
            });
        }

        self.pending_prompt = None;
        self.complete_round()
    }

    fn pause_session(&mut self) -> GameResult<()> {
        if self.session.is_none() {
            return Err(GameError::InvalidCommand {
                command: "pause_session",
                phase: self.phase,
            });
        }
        if self.phase == Phase::Suspended || self.phase.is_terminal() {
            return Ok(());
        }

        self.cancel_timers();
        if self.track_started {
            if let Err(err) = self.collaborators.audio.pause() {
                log_warn!("audio pause failed: {err}");
            }
        }

        let interrupted = self.phase;
        if let Some(session) = self.session.as_mut() {
            session.suspended_from = Some(interrupted);
        }
        self.enter(Phase::Suspended)
    }

    fn resume_session(&mut self) -> GameResult<()> {
        if self.phase != Phase::Suspended {
            return Err(GameError::InvalidCommand {
                command: "resume_session",
                phase: self.phase,
            });
        }

        let target = self
            .session
            .as_mut()
            .and_then(|session| session.suspended_from.take())
            .unwrap_or(Phase::Idle);
        log_info!("resuming into {target}");

        match target {
            Phase::ChairDetection => self.start_chair_detection(),
            Phase::CalibrationCountdown => self.start_calibration(),
            Phase::Playing | Phase::ResumeCountdown => self.start_resume_countdown(),
            Phase::PausedSettling | Phase::OccupancyCheck => self.enter_settling(),
            Phase::AwaitingChairCount | Phase::MismatchPause => {
                self.enter(target)?;
                if let Some(prompt) = self.pending_prompt.clone() {
                    self.emit(prompt);
                }
                Ok(())
            }
            Phase::Idle | Phase::GameOver => self.enter(target),
            Phase::Suspended => Ok(()),
        }
    }

    fn teardown_session(&mut self) -> GameResult<()> {
        self.cancel_timers();
        self.pending_prompt = None;

        if let Some(session) = self.session.take() {
            if let Err(err) = self.collaborators.audio.release() {
                log_warn!("audio release failed: {err}");
            }
            log_info!("session {} torn down in {}", session.id, self.phase);
            self.track_started = false;
            self.phase = Phase::Idle;
            self.emit(GameEvent::SessionEnded {
                session_id: session.id,
            });
        }
        Ok(())
    }

    fn switch_camera(&mut self) -> bool {
        self.using_front_camera = !self.using_front_camera;
        self.collaborators
            .camera
            .select_front(self.using_front_camera);
        if let Some(session) = self.session.as_mut() {
            session.using_front_camera = self.using_front_camera;
        }
        self.using_front_camera
    }

    fn snapshot(&self) -> SessionSnapshot {
        let session = self.session.as_ref();
        SessionSnapshot {
            session_id: session.map(|s| s.id.clone()),
            phase: self.phase,
            chair_count: session.map(|s| s.chair_count).unwrap_or(0),
            expected_seated: session.and_then(|s| s.expected_seated),
            track: session.map(|s| s.track.clone()),
            using_front_camera: self.using_front_camera,
            round: session.map(|s| s.round).unwrap_or(0),
            stop_armed: matches!(
                &self.delay,
                Some(PendingDelay::Stop(handle)) if !handle.is_cancelled()
            ),
        }
    }

    // ---- phase entry -----------------------------------------------------

    fn start_chair_detection(&mut self) -> GameResult<()> {
        if !self.collaborators.camera.is_available() {
            return self.halt(
                Resource::Camera,
                "no camera frames available".into(),
                Phase::ChairDetection,
            );
        }

        self.enter(Phase::ChairDetection)?;
        self.play_cue();

        let spec = self.sampling_spec();
        let samples = SampleWindow::with_capacity(spec.tick_count() as usize);
        let handle = self.open_window(spec);
        self.window = Some(ActiveWindow::Chairs { handle, samples });
        Ok(())
    }

    fn request_manual_entry(&mut self, reason: ManualEntryReason) -> GameResult<()> {
        self.enter(Phase::AwaitingChairCount)?;
        let prompt = GameEvent::ManualEntryRequested { reason };
        self.emit(prompt.clone());
        self.pending_prompt = Some(prompt);
        Ok(())
    }

    fn start_calibration(&mut self) -> GameResult<()> {
        self.enter(Phase::CalibrationCountdown)?;
        self.start_countdown(Phase::CalibrationCountdown);
        Ok(())
    }

    fn start_resume_countdown(&mut self) -> GameResult<()> {
        self.enter(Phase::ResumeCountdown)?;
        self.start_countdown(Phase::ResumeCountdown);
        Ok(())
    }

    fn start_countdown(&mut self, phase: Phase) {
        self.play_cue();
        let duration = match phase {
            Phase::CalibrationCountdown => self.settings.calibration_countdown(),
            _ => self.settings.resume_countdown(),
        };
        let handle = self.open_window(WindowSpec::new(duration, self.settings.tick_interval()));
        self.window = Some(ActiveWindow::Countdown { handle, phase });
    }

    fn start_music(&mut self) -> GameResult<()> {
        let played = if self.track_started {
            self.collaborators.audio.resume()
        } else {
            match self.session.as_ref() {
                Some(session) => self.collaborators.audio.play_track(&session.track),
                None => return Ok(()),
            }
        };

        if let Err(err) = played {
            let retry = if self.track_started {
                Phase::ResumeCountdown
            } else {
                Phase::CalibrationCountdown
            };
            return self.halt(Resource::Audio, err.to_string(), retry);
        }

        self.track_started = true;
        self.enter(Phase::Playing)?;
        self.arm_stop();
        Ok(())
    }

    fn arm_stop(&mut self) {
        let delay = self.settings.random_stop.sample(&mut self.rng);
        let tx = self.internal_tx.clone();
        let handle = self.scheduler.delay(delay, move |timer| {
            let _ = tx.send(Internal::DelayElapsed { timer });
        });
        log_info!("music stops in {}s", delay.as_secs());
        self.delay = Some(PendingDelay::Stop(handle));
        self.emit(GameEvent::StopScheduled {
            delay_ms: delay.as_millis() as u64,
        });
    }

    fn stop_music(&mut self) -> GameResult<()> {
        if let Err(err) = self.collaborators.audio.pause() {
            log_warn!("audio pause failed: {err}");
        }
        let round = match self.session.as_mut() {
            Some(session) => {
                session.round += 1;
                session.round
            }
            None => 0,
        };
        self.emit(GameEvent::MusicStopped { round });
        self.enter_settling()
    }

    fn enter_settling(&mut self) -> GameResult<()> {
        self.cancel_timers();
        self.enter(Phase::PausedSettling)?;

        let tx = self.internal_tx.clone();
        let handle = self
            .scheduler
            .delay(self.settings.settle_delay(), move |timer| {
                let _ = tx.send(Internal::DelayElapsed { timer });
            });
        self.delay = Some(PendingDelay::Settle(handle));
        Ok(())
    }

    fn after_settle(&mut self) -> GameResult<()> {
        if self.settings.variant.use_remote_occupancy_check {
            self.start_occupancy_check()
        } else {
            self.complete_round()
        }
    }

    fn start_occupancy_check(&mut self) -> GameResult<()> {
        if !self.collaborators.camera.is_available() {
            return self.halt(
                Resource::Camera,
                "no camera frames available".into(),
                Phase::PausedSettling,
            );
        }

        let expected = match self.session.as_mut() {
            Some(session) => {
                session.expected_seated = Some(session.chair_count);
                session.chair_count
            }
            None => return Ok(()),
        };

        self.enter(Phase::OccupancyCheck)?;
        let handle = self.open_window(self.sampling_spec());
        self.window = Some(ActiveWindow::Occupancy {
            handle,
            check: OccupancyCheck::new(expected),
        });
        Ok(())
    }

    fn on_mismatch(&mut self, expected: u32, detected: u32) -> GameResult<()> {
        self.cancel_timers();
        log_info!("occupancy mismatch: expected {expected}, detected {detected}");
        self.enter(Phase::MismatchPause)?;

        let prompt = GameEvent::MismatchDetected { expected, detected };
        self.emit(prompt.clone());
        self.pending_prompt = Some(prompt);
        Ok(())
    }

    fn complete_round(&mut self) -> GameResult<()> {
        let decrement = self.settings.variant.decrement_on_pause;
        let remaining = match self.session.as_mut() {
            Some(session) => {
                session.expected_seated = None;
                if decrement {
                    session.chair_count = session.chair_count.saturating_sub(1);
                }
                session.chair_count
            }
            None => return Ok(()),
        };

        if decrement {
            self.emit(GameEvent::ChairRemoved { remaining });
            if remaining == 0 {
                return self.finish_game();
            }
        }
        self.start_resume_countdown()
    }

    fn finish_game(&mut self) -> GameResult<()> {
        self.cancel_timers();
        if let Err(err) = self.collaborators.audio.release() {
            log_warn!("audio release failed: {err}");
        }
        self.enter(Phase::GameOver)?;

        let rounds = self.session.as_ref().map(|s| s.round).unwrap_or(0);
        log_info!("game over after {rounds} rounds");
        self.emit(GameEvent::GameOver { rounds });
        Ok(())
    }

    /// Stop automatic progress until the host resumes the session.
    fn halt(&mut self, resource: Resource, message: String, retry: Phase) -> GameResult<()> {
        self.cancel_timers();
        log_warn!("{resource} unavailable in {}: {message}", self.phase);

        if let Some(session) = self.session.as_mut() {
            session.suspended_from = Some(retry);
        }
        if self.phase != Phase::Suspended {
            self.enter(Phase::Suspended)?;
        }
        self.emit(GameEvent::ResourceUnavailable { resource, message });
        Ok(())
    }

    // ---- scheduler and detection notifications ---------------------------

    fn on_tick(&mut self, timer: TimerId, tick: Tick) -> GameResult<()> {
        let (phase, probe) = match self.window.as_ref() {
            Some(window) if window.owns(timer) => match window {
                ActiveWindow::Chairs { .. } => (Phase::ChairDetection, Some(Probe::Chairs)),
                ActiveWindow::Occupancy { .. } => (Phase::OccupancyCheck, Some(Probe::Seated)),
                ActiveWindow::Countdown { phase, .. } => (*phase, None),
            },
            _ => {
                log_debug!("ignoring stale tick from {timer}");
                return Ok(());
            }
        };

        self.emit(GameEvent::Countdown {
            phase,
            remaining_secs: tick.remaining_secs(),
        });
        if let Some(probe) = probe {
            self.dispatch_capture(timer, probe);
        }
        Ok(())
    }

    fn dispatch_capture(&self, timer: TimerId, probe: Probe) {
        let camera = Arc::clone(&self.collaborators.camera);
        let detector = Arc::clone(&self.collaborators.detector);
        let tx = self.internal_tx.clone();

        tokio::spawn(async move {
            let result = match camera.capture_frame().await {
                Some(frame) if !frame.is_empty() => match probe {
                    Probe::Chairs => detector.detect_chairs(frame).await,
                    Probe::Seated => detector.detect_occupancy(frame).await,
                },
                _ => Err(DetectionError::EmptyFrame),
            };
            let _ = tx.send(Internal::Sample {
                timer,
                probe,
                result,
            });
        });
    }

    fn on_sample(
        &mut self,
        timer: TimerId,
        probe: Probe,
        result: Result<u32, DetectionError>,
    ) -> GameResult<()> {
        if !self.window.as_ref().is_some_and(|w| w.owns(timer)) {
            log_debug!("discarding {probe:?} result from {timer}");
            return Ok(());
        }
        if let Err(err) = &result {
            log_warn!("{probe:?} detection failed: {err}");
        }

        let value = result.as_ref().ok().copied();
        let mut recorded = None;
        let mut mismatch = None;

        match self.window.as_mut() {
            Some(ActiveWindow::Chairs { samples, .. }) => {
                if let Some(count) = value {
                    let sample = DetectionSample::chairs(count);
                    if samples.push(sample.clone()) {
                        recorded = Some(sample);
                    } else {
                        log_warn!("chair sample window full; dropping {count}");
                    }
                }
            }
            Some(ActiveWindow::Occupancy { handle, check }) => match check.observe(value) {
                OccupancyVerdict::Mismatch { expected, detected } => {
                    handle.cancel();
                    mismatch = Some((expected, detected));
                }
                OccupancyVerdict::Continue => {
                    recorded = value.map(DetectionSample::seated);
                }
                OccupancyVerdict::Ignored => {}
            },
            _ => {}
        }

        if let Some(sample) = recorded {
            self.emit(GameEvent::SampleRecorded { sample });
        }
        if let Some((expected, detected)) = mismatch {
            self.window = None;
            return self.on_mismatch(expected, detected);
        }
        Ok(())
    }

    fn on_window_done(&mut self, timer: TimerId) -> GameResult<()> {
        if !self.window.as_ref().is_some_and(|w| w.owns(timer)) {
            log_debug!("ignoring completion of stale {timer}");
            return Ok(());
        }
        let Some(window) = self.window.take() else {
            return Ok(());
        };

        match window {
            ActiveWindow::Chairs { samples, .. } => {
                if samples.dropped() > 0 {
                    log_warn!("{} chair samples arrived after the window filled", samples.dropped());
                }
                self.decide_chair_count(samples)
            }
            ActiveWindow::Occupancy { check, .. } => {
                let failed = check.failed();
                match check.finish() {
                    OccupancyOutcome::Confirmed { expected, agreeing } => {
                        log_info!(
                            "occupancy confirmed at {expected} ({agreeing} agreeing, {failed} failed)"
                        );
                        self.emit(GameEvent::OccupancyConfirmed { expected });
                        self.complete_round()
                    }
                    OccupancyOutcome::Mismatch { expected, detected } => {
                        self.on_mismatch(expected, detected)
                    }
                }
            }
            ActiveWindow::Countdown { .. } => self.start_music(),
        }
    }

    fn decide_chair_count(&mut self, samples: SampleWindow) -> GameResult<()> {
        match samples.decide() {
            Ok(0) => self.request_manual_entry(ManualEntryReason::ZeroDetected),
            Ok(count) => {
                self.set_chair_count(count, ChairSource::Consensus);
                self.start_calibration()
            }
            Err(err) => {
                log_info!("{err}; falling back to manual entry");
                self.request_manual_entry(ManualEntryReason::Undetermined)
            }
        }
    }

    fn on_delay(&mut self, timer: TimerId) -> GameResult<()> {
        let current = self
            .delay
            .as_ref()
            .is_some_and(|d| d.handle().id() == timer && !d.handle().is_cancelled());
        if !current {
            log_debug!("ignoring stale delayed action {timer}");
            return Ok(());
        }

        match self.delay.take() {
            Some(PendingDelay::Stop(_)) => self.stop_music(),
            Some(PendingDelay::Settle(_)) => self.after_settle(),
            None => Ok(()),
        }
    }

    // ---- helpers -----------------------------------------------------------

    fn enter(&mut self, next: Phase) -> GameResult<()> {
        let from = self.phase;
        if !transitions::is_allowed(from, next) {
            return Err(GameError::IllegalTransition { from, to: next });
        }

        self.phase = next;
        if let Some(session) = self.session.as_mut() {
            session.phase = next;
        }
        log_info!("phase {from} -> {next}");
        self.emit(GameEvent::PhaseChanged { from, to: next });
        Ok(())
    }

    fn set_chair_count(&mut self, count: u32, source: ChairSource) {
        if let Some(session) = self.session.as_mut() {
            session.chair_count = count;
        }
        log_info!("chair count set to {count} ({source:?})");
        self.emit(GameEvent::ChairCountDecided { count, source });
    }

    fn sampling_spec(&self) -> WindowSpec {
        WindowSpec::new(self.settings.sampling_window(), self.settings.tick_interval())
    }

    fn open_window(&mut self, spec: WindowSpec) -> WindowHandle {
        let tick_tx = self.internal_tx.clone();
        let done_tx = self.internal_tx.clone();
        self.scheduler.open_window(
            spec,
            move |timer, tick| {
                let _ = tick_tx.send(Internal::Tick { timer, tick });
            },
            move |timer| {
                let _ = done_tx.send(Internal::WindowDone { timer });
            },
        )
    }

    fn cancel_timers(&mut self) {
        self.scheduler.cancel_all();
        self.window = None;
        self.delay = None;
    }

    fn play_cue(&self) {
        if let Err(err) = self.collaborators.audio.play_cue(&self.settings.cue_id) {
            log_warn!("countdown cue failed: {err}");
        }
    }

    fn emit(&self, event: GameEvent) {
        let _ = self.events.send(event);
    }
}
