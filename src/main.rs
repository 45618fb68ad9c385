use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use musical_chairs_lib::audio::AudioService;
use musical_chairs_lib::camera::StillFrameCamera;
use musical_chairs_lib::detection::{HttpConnectivityProbe, HttpDetectionClient};
use musical_chairs_lib::{
    init_logging, Collaborators, GameEvent, GameSettings, ManualEntryReason, RoundController,
    RoundVariant, SessionHandle, SettingsStore, TrackHandle,
};

#[derive(Parser, Debug)]
#[command(name = "musical-chairs", about = "Referee a game of musical chairs from the terminal")]
struct Cli {
    /// Audio file to play during rounds
    track: String,

    /// JSON settings file (created with defaults when missing)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Directory of still images served as camera frames
    #[arg(long, default_value = "frames")]
    frames: PathBuf,

    /// Remove a chair after every round instead of verifying seats
    #[arg(long)]
    elimination: bool,
}

fn audio_backend() -> Arc<dyn AudioService> {
    #[cfg(feature = "playback")]
    {
        Arc::new(musical_chairs_lib::audio::RodioAudio::new())
    }

    #[cfg(not(feature = "playback"))]
    {
        Arc::new(musical_chairs_lib::audio::NullAudio)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => SettingsStore::new(path.clone())?.settings(),
        None => GameSettings::default(),
    };
    settings.apply_env();
    if cli.elimination {
        settings.variant = RoundVariant::elimination();
    }

    init_logging(settings.debug);
    log::info!("Musical chairs starting up...");

    let detector = HttpDetectionClient::from_settings(&settings)?;
    let connectivity =
        HttpConnectivityProbe::new(settings.chair_endpoint.clone(), settings.connectivity_timeout())?;
    let camera = StillFrameCamera::from_dir(&cli.frames)?;

    let collaborators = Collaborators {
        audio: audio_backend(),
        camera: Arc::new(camera),
        detector: Arc::new(detector),
        connectivity: Arc::new(connectivity),
    };
    let (handle, mut events, controller) = RoundController::spawn(settings, collaborators)?;

    handle.start_session(TrackHandle::new(cli.track)).await?;
    println!("commands: <number> | ok | pause | resume | camera | status | quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => print_event(&event)?,
                None => break,
            },
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !dispatch(&handle, line.trim()).await {
                    break;
                }
            }
        }
    }

    handle.teardown_session().await?;
    drop(handle);
    controller.await.context("round controller task failed")?;
    Ok(())
}

fn print_event(event: &GameEvent) -> Result<()> {
    match event {
        GameEvent::ManualEntryRequested { reason } => {
            let why = match reason {
                ManualEntryReason::Offline => "detection service offline",
                ManualEntryReason::Undetermined => "no usable detections",
                ManualEntryReason::ZeroDetected => "no chairs detected",
            };
            println!("{why}: type the number of chairs");
        }
        GameEvent::MismatchDetected { expected, detected } => {
            println!("expected {expected} seated, detected {detected}: type `ok` to continue");
        }
        GameEvent::GameOver { rounds } => {
            println!("we have a winner after {rounds} rounds! type `quit` to exit");
        }
        _ => println!("{}", serde_json::to_string(event)?),
    }
    Ok(())
}

/// Returns `false` when the host should exit.
async fn dispatch(handle: &SessionHandle, line: &str) -> bool {
    let result = match line {
        "" => Ok(()),
        "quit" | "exit" => return false,
        "ok" => handle.acknowledge_mismatch().await,
        "pause" => handle.pause_session().await,
        "resume" => handle.resume_session().await,
        "camera" => handle.switch_camera().await.map(|front| {
            println!("using {} camera", if front { "front" } else { "back" });
        }),
        "status" => handle.snapshot().await.map(|snapshot| {
            println!("{snapshot:?}");
        }),
        other => match other.parse::<u32>() {
            Ok(count) => handle.submit_chair_count(count).await,
            Err(_) => {
                println!("unknown command `{other}`");
                Ok(())
            }
        },
    };

    if let Err(err) = result {
        println!("{err}");
    }
    true
}
