use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock, time::Duration};

use crate::timer::StopRange;

/// Which of the game's round flavours the controller runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RoundVariant {
    /// Verify seated players against the chair count before resuming.
    pub use_remote_occupancy_check: bool,
    /// Remove one chair after each completed round; zero chairs ends the game.
    pub decrement_on_pause: bool,
    pub sampling_window_secs: u64,
}

impl Default for RoundVariant {
    fn default() -> Self {
        Self::verified()
    }
}

impl RoundVariant {
    pub fn verified() -> Self {
        Self {
            use_remote_occupancy_check: true,
            decrement_on_pause: false,
            sampling_window_secs: 10,
        }
    }

    pub fn elimination() -> Self {
        Self {
            use_remote_occupancy_check: false,
            decrement_on_pause: true,
            sampling_window_secs: 10,
        }
    }

    pub fn verified_elimination() -> Self {
        Self {
            use_remote_occupancy_check: true,
            decrement_on_pause: true,
            sampling_window_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameSettings {
    pub chair_endpoint: String,
    pub occupancy_endpoint: String,
    pub request_timeout_secs: u64,
    pub connectivity_timeout_secs: u64,
    pub variant: RoundVariant,
    pub tick_interval_ms: u64,
    pub calibration_countdown_secs: u64,
    pub resume_countdown_secs: u64,
    pub settle_delay_ms: u64,
    pub random_stop: StopRange,
    pub cue_id: String,
    #[serde(skip)]
    pub debug: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            chair_endpoint: "http://127.0.0.1:5000/object".into(),
            occupancy_endpoint: "http://127.0.0.1:5000/sitstand".into(),
            request_timeout_secs: 10,
            connectivity_timeout_secs: 3,
            variant: RoundVariant::default(),
            tick_interval_ms: 1000,
            calibration_countdown_secs: 10,
            resume_countdown_secs: 10,
            settle_delay_ms: 2000,
            random_stop: StopRange::new(30, 45),
            cue_id: "countdown".into(),
            debug: false,
        }
    }
}

impl GameSettings {
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            bail!("tick_interval_ms must be greater than zero");
        }
        if self.variant.sampling_window_secs == 0 {
            bail!("sampling_window_secs must be greater than zero");
        }
        if self.sampling_window() < self.tick_interval() {
            bail!("sampling window is shorter than one tick");
        }
        if self.random_stop.min_secs > self.random_stop.max_secs {
            bail!(
                "random stop range is inverted ({}..={})",
                self.random_stop.min_secs,
                self.random_stop.max_secs
            );
        }
        Ok(())
    }

    /// Overlay `MUSICAL_CHAIRS_*` environment variables.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("MUSICAL_CHAIRS_CHAIR_URL") {
            self.chair_endpoint = url;
        }
        if let Ok(url) = std::env::var("MUSICAL_CHAIRS_OCCUPANCY_URL") {
            self.occupancy_endpoint = url;
        }

        let debug_mode = std::env::var("MUSICAL_CHAIRS_DEBUG")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if debug_mode {
            self.debug = true;
            self.random_stop = StopRange::new(1, 2);
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn sampling_window(&self) -> Duration {
        Duration::from_secs(self.variant.sampling_window_secs)
    }

    pub fn calibration_countdown(&self) -> Duration {
        Duration::from_secs(self.calibration_countdown_secs)
    }

    pub fn resume_countdown(&self) -> Duration {
        Duration::from_secs(self.resume_countdown_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connectivity_timeout(&self) -> Duration {
        Duration::from_secs(self.connectivity_timeout_secs)
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<GameSettings>,
}

impl SettingsStore {
    /// Loads settings from `path`, writing the defaults there when the file is missing.
    pub fn new(path: PathBuf) -> Result<Self> {
        let missing = !path.exists();
        let data = if !missing {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(err) => {
                    log::warn!(
                        "Ignoring unreadable settings at {}: {err}",
                        path.display()
                    );
                    GameSettings::default()
                }
            }
        } else {
            GameSettings::default()
        };

        let store = Self {
            path,
            data: RwLock::new(data),
        };
        if missing {
            store.persist(&store.settings())?;
        }
        Ok(store)
    }

    pub fn settings(&self) -> GameSettings {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update(&self, settings: GameSettings) -> Result<()> {
        settings.validate()?;
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        *guard = settings;
        self.persist(&guard)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        let data: GameSettings = serde_json::from_str(&contents)?;
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        *guard = data;
        Ok(())
    }

    fn persist(&self, data: &GameSettings) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
