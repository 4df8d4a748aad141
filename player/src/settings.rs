use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::SettingsError;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    /// Name the generator service expects.
    pub const fn name(self) -> &'static str {
        use Difficulty::*;
        match self {
            Beginner => "Beginner",
            Intermediate => "Intermediate",
            Expert => "Expert",
        }
    }
}

/// Maps the user-facing speed (1-100) to the delay between playback ticks.
pub fn speed_to_cadence(speed: u8) -> Duration {
    let speed = u64::from(speed.clamp(Settings::MIN_SPEED, Settings::MAX_SPEED));
    Duration::from_millis(905 - speed * 9)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// Number of problems requested per generation.
    pub count: u32,
    pub speed: u8,
    /// Fixed delay between playback ticks, overrides `speed` when set.
    pub cadence_ms: Option<u64>,
    /// Fail processing when the solver returns a different number of results than problems sent.
    pub strict_results: bool,
    pub api_url: String,
    pub request_timeout_secs: u64,
}

impl Settings {
    pub const MIN_COUNT: u32 = 1;
    pub const MAX_COUNT: u32 = 1000;
    pub const MIN_SPEED: u8 = 1;
    pub const MAX_SPEED: u8 = 100;

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_owned(),
            source,
        })?;
        let settings: Self = toml::from_str(&text)?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings.normalized())
    }

    pub fn normalized(mut self) -> Self {
        self.set_count(self.count);
        self.set_speed(self.speed);
        self
    }

    pub fn set_count(&mut self, count: u32) {
        self.count = count.clamp(Self::MIN_COUNT, Self::MAX_COUNT);
    }

    pub fn set_speed(&mut self, speed: u8) {
        self.speed = speed.clamp(Self::MIN_SPEED, Self::MAX_SPEED);
    }

    pub fn cadence(&self) -> Duration {
        self.cadence_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| speed_to_cadence(self.speed))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            count: 1,
            speed: 50,
            cadence_ms: None,
            strict_results: false,
            api_url: "http://localhost:8000".to_owned(),
            request_timeout_secs: 30,
        }
    }
}
