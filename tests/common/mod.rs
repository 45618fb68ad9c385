#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use musical_chairs_lib::audio::{AudioError, AudioService};
use musical_chairs_lib::camera::CameraService;
use musical_chairs_lib::detection::{DetectionClient, DetectionError, StaticConnectivity};
use musical_chairs_lib::game::controller::EventStream;
use musical_chairs_lib::timer::StopRange;
use musical_chairs_lib::{
    Collaborators, GameEvent, GameSettings, Phase, RoundController, SessionHandle, TrackHandle,
};
use tokio::task::JoinHandle;

#[derive(Default)]
pub struct RecordingAudio {
    calls: Mutex<Vec<String>>,
    pub fail_play: AtomicBool,
}

impl RecordingAudio {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

impl AudioService for RecordingAudio {
    fn play_track(&self, track: &TrackHandle) -> Result<(), AudioError> {
        if self.fail_play.load(Ordering::SeqCst) {
            return Err(AudioError::Track("file vanished".into()));
        }
        self.record(format!("play:{}", track.as_str()));
        Ok(())
    }

    fn pause(&self) -> Result<(), AudioError> {
        self.record("pause");
        Ok(())
    }

    fn resume(&self) -> Result<(), AudioError> {
        self.record("resume");
        Ok(())
    }

    fn play_cue(&self, cue_id: &str) -> Result<(), AudioError> {
        self.record(format!("cue:{cue_id}"));
        Ok(())
    }

    fn release(&self) -> Result<(), AudioError> {
        self.record("release");
        Ok(())
    }
}

pub struct FakeCamera {
    pub available: AtomicBool,
    pub front: AtomicBool,
}

impl Default for FakeCamera {
    fn default() -> Self {
        Self {
            available: AtomicBool::new(true),
            front: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl CameraService for FakeCamera {
    async fn capture_frame(&self) -> Option<Vec<u8>> {
        if self.available.load(Ordering::SeqCst) {
            Some(vec![0xFF, 0xD8, 0xFF, 0xD9])
        } else {
            None
        }
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn select_front(&self, front: bool) {
        self.front.store(front, Ordering::SeqCst);
    }
}

/// Answers from a script, then from a fallback once the script runs out.
/// `None` stands for a failed request.
pub struct ScriptedDetector {
    chairs: Mutex<VecDeque<Option<u32>>>,
    chair_fallback: Mutex<Option<u32>>,
    seated: Mutex<VecDeque<Option<u32>>>,
    seated_fallback: Mutex<Option<u32>>,
    latency: Duration,
    pub chair_calls: AtomicUsize,
    pub seated_calls: AtomicUsize,
}

impl ScriptedDetector {
    pub fn new() -> Self {
        Self {
            chairs: Mutex::new(VecDeque::new()),
            chair_fallback: Mutex::new(None),
            seated: Mutex::new(VecDeque::new()),
            seated_fallback: Mutex::new(None),
            latency: Duration::ZERO,
            chair_calls: AtomicUsize::new(0),
            seated_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn chairs(self, script: &[Option<u32>], fallback: Option<u32>) -> Self {
        *self.chairs.lock().unwrap() = script.iter().copied().collect();
        *self.chair_fallback.lock().unwrap() = fallback;
        self
    }

    pub fn seated(self, script: &[Option<u32>], fallback: Option<u32>) -> Self {
        *self.seated.lock().unwrap() = script.iter().copied().collect();
        *self.seated_fallback.lock().unwrap() = fallback;
        self
    }

    pub fn set_chair_fallback(&self, fallback: Option<u32>) {
        *self.chair_fallback.lock().unwrap() = fallback;
    }

    fn next(queue: &Mutex<VecDeque<Option<u32>>>, fallback: &Mutex<Option<u32>>) -> Option<u32> {
        let scripted = queue.lock().unwrap().pop_front();
        match scripted {
            Some(answer) => answer,
            None => *fallback.lock().unwrap(),
        }
    }
}

#[async_trait]
impl DetectionClient for ScriptedDetector {
    async fn detect_chairs(&self, _image: Vec<u8>) -> Result<u32, DetectionError> {
        self.chair_calls.fetch_add(1, Ordering::SeqCst);
        let answer = Self::next(&self.chairs, &self.chair_fallback);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        answer.ok_or_else(|| DetectionError::Transport("connection refused".into()))
    }

    async fn detect_occupancy(&self, _image: Vec<u8>) -> Result<u32, DetectionError> {
        self.seated_calls.fetch_add(1, Ordering::SeqCst);
        let answer = Self::next(&self.seated, &self.seated_fallback);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        answer.ok_or(DetectionError::Status(502))
    }
}

pub struct Harness {
    pub handle: SessionHandle,
    pub events: EventStream,
    pub task: JoinHandle<()>,
    pub audio: Arc<RecordingAudio>,
    pub camera: Arc<FakeCamera>,
    pub detector: Arc<ScriptedDetector>,
}

/// Reference timings with a fixed five-second stop so runs are deterministic.
pub fn test_settings() -> GameSettings {
    GameSettings {
        random_stop: StopRange::new(5, 5),
        ..GameSettings::default()
    }
}

pub fn harness(settings: GameSettings, online: bool, detector: ScriptedDetector) -> Harness {
    let audio = Arc::new(RecordingAudio::default());
    let camera = Arc::new(FakeCamera::default());
    let detector = Arc::new(detector);

    let collaborators = Collaborators {
        audio: audio.clone(),
        camera: camera.clone(),
        detector: detector.clone(),
        connectivity: Arc::new(StaticConnectivity(online)),
    };
    let (handle, events, task) =
        RoundController::spawn_seeded(settings, collaborators, 7).expect("valid settings");

    Harness {
        handle,
        events,
        task,
        audio,
        camera,
        detector,
    }
}

pub fn track() -> TrackHandle {
    TrackHandle::new("songs/party.mp3")
}

/// Skip events until one matches; fails instead of hanging if the game stalls.
pub async fn expect_event<F>(events: &mut EventStream, mut matches: F) -> GameEvent
where
    F: FnMut(&GameEvent) -> bool,
{
    let wait = async {
        loop {
            match events.recv().await {
                Some(event) if matches(&event) => return event,
                Some(_) => continue,
                None => panic!("event stream closed"),
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(600), wait)
        .await
        .expect("timed out waiting for event")
}

pub async fn expect_phase(events: &mut EventStream, phase: Phase) {
    expect_event(events, |event| {
        matches!(event, GameEvent::PhaseChanged { to, .. } if *to == phase)
    })
    .await;
}

/// Everything already emitted, without waiting.
pub fn drain(events: &mut EventStream) -> Vec<GameEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}
