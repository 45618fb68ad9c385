use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::{
    mpsc::{self, Sender},
    Mutex,
};
use std::thread;

use super::cue::CountdownBeep;
use super::{AudioError, AudioService};
use crate::models::TrackHandle;

enum AudioCommand {
    PlayTrack(PathBuf),
    Pause,
    Resume,
    Cue(String),
    Release,
}

/// rodio output on a dedicated thread holding the non-Send stream objects.
/// Music and cues use separate sinks so a cue never pauses the track.
pub struct RodioAudio {
    tx: Mutex<Option<Sender<AudioCommand>>>,
}

impl Default for RodioAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl RodioAudio {
    pub fn new() -> Self {
        Self {
            tx: Mutex::new(None),
        }
    }

    fn ensure_thread(&self) -> Result<Sender<AudioCommand>, AudioError> {
        let mut guard = self
            .tx
            .lock()
            .map_err(|e| AudioError::Device(e.to_string()))?;
        if let Some(tx) = guard.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<AudioCommand>();

        thread::Builder::new()
            .name("audio-engine".to_string())
            .spawn(move || {
                let mut output: Option<(OutputStream, OutputStreamHandle)> = None;
                let mut music: Option<Sink> = None;
                let mut cue: Option<Sink> = None;

                fn open_sink(
                    output: &mut Option<(OutputStream, OutputStreamHandle)>,
                ) -> Result<Sink, String> {
                    if output.is_none() {
                        let opened = OutputStream::try_default()
                            .map_err(|e| format!("Failed to create audio output stream: {}", e))?;
                        *output = Some(opened);
                    }
                    let (_, handle) = output
                        .as_ref()
                        .ok_or_else(|| "audio output stream missing".to_string())?;
                    Sink::try_new(handle).map_err(|e| format!("Failed to create audio sink: {}", e))
                }

                while let Ok(cmd) = rx.recv() {
                    match cmd {
                        AudioCommand::PlayTrack(path) => {
                            if let Some(old) = music.take() {
                                old.stop();
                            }
                            let result = File::open(&path)
                                .map_err(|e| format!("{}: {e}", path.display()))
                                .and_then(|file| {
                                    Decoder::new(BufReader::new(file))
                                        .map_err(|e| format!("{}: {e}", path.display()))
                                })
                                .and_then(|source| {
                                    let sink = open_sink(&mut output)?;
                                    sink.append(source);
                                    sink.play();
                                    music = Some(sink);
                                    Ok(())
                                });
                            if let Err(e) = result {
                                log::error!("track failed to start: {e}");
                            }
                        }
                        AudioCommand::Pause => {
                            if let Some(ref s) = music {
                                s.pause();
                            }
                        }
                        AudioCommand::Resume => {
                            if let Some(ref s) = music {
                                s.play();
                            }
                        }
                        AudioCommand::Cue(cue_id) => {
                            if let Some(old) = cue.take() {
                                old.stop();
                            }
                            match open_sink(&mut output) {
                                Ok(sink) => {
                                    if let Some(beep) = CountdownBeep::for_id(&cue_id) {
                                        sink.append(beep);
                                    } else {
                                        match File::open(&cue_id)
                                            .map_err(|e| e.to_string())
                                            .and_then(|f| {
                                                Decoder::new(BufReader::new(f))
                                                    .map_err(|e| e.to_string())
                                            }) {
                                            Ok(source) => sink.append(source),
                                            Err(e) => log::warn!("cue {cue_id} unplayable: {e}"),
                                        }
                                    }
                                    cue = Some(sink);
                                }
                                Err(e) => log::warn!("cue sink unavailable: {e}"),
                            }
                        }
                        AudioCommand::Release => {
                            if let Some(s) = music.take() {
                                s.stop();
                            }
                            if let Some(s) = cue.take() {
                                s.stop();
                            }
                            output = None;
                        }
                    }
                }
            })
            .map_err(|e| AudioError::Unavailable(e.to_string()))?;

        *guard = Some(tx.clone());
        Ok(tx)
    }

    fn send(&self, command: AudioCommand) -> Result<(), AudioError> {
        let tx = self.ensure_thread()?;
        tx.send(command)
            .map_err(|e| AudioError::Unavailable(e.to_string()))
    }
}

impl AudioService for RodioAudio {
    /// Only a missing file is reported here; decode and device failures surface
    /// on the audio thread and are logged there.
    fn play_track(&self, track: &TrackHandle) -> Result<(), AudioError> {
        let path = PathBuf::from(track.as_str());
        if !path.is_file() {
            return Err(AudioError::Track(format!("{} is not a file", path.display())));
        }
        self.send(AudioCommand::PlayTrack(path))
    }

    fn pause(&self) -> Result<(), AudioError> {
        self.send(AudioCommand::Pause)
    }

    fn resume(&self) -> Result<(), AudioError> {
        self.send(AudioCommand::Resume)
    }

    fn play_cue(&self, cue_id: &str) -> Result<(), AudioError> {
        self.send(AudioCommand::Cue(cue_id.to_string()))
    }

    fn release(&self) -> Result<(), AudioError> {
        if let Ok(Some(tx)) = self.tx.lock().map(|g| g.clone()) {
            let _ = tx.send(AudioCommand::Release);
        }
        Ok(())
    }
}
