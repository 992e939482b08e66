//! Session configuration
//!
//! Read from a JSON file; every field is optional and falls back to its
//! default, including the nested balance tables.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAX_CATCH_UP_FRAMES, SIM_HZ};
use crate::tuning::Tuning;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Error reading config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Error parsing config")]
    Parse {
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed; the same seed and inputs replay the same session
    pub seed: u64,
    /// Logical frames per second
    pub sim_hz: f64,
    /// Catch-up cap after a stall
    pub max_catch_up_frames: u32,
    /// Game balance
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0,
            sim_hz: SIM_HZ,
            max_catch_up_frames: MAX_CATCH_UP_FRAMES,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json).map_err(|source| ConfigError::Parse { source })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{err}, using default settings");
                Self::default()
            }
        }
    }

    /// Duration of one logical frame (ms)
    pub fn frame_ms(&self) -> f64 {
        1000.0 / self.sim_hz
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sim_hz.is_finite() && self.sim_hz > 0.0) {
            return Err(ConfigError::Invalid(format!("sim_hz must be positive, got {}", self.sim_hz)));
        }
        if self.max_catch_up_frames == 0 {
            return Err(ConfigError::Invalid("max_catch_up_frames must be at least 1".to_string()));
        }
        let rooms = &self.tuning.rooms;
        if rooms.total == 0 || rooms.boss_room == 0 || rooms.boss_room > rooms.total {
            return Err(ConfigError::Invalid(format!(
                "boss_room {} must lie within 1..={}",
                rooms.boss_room, rooms.total
            )));
        }
        let total = rooms.total as usize;
        if rooms.enemies_per_room.len() < total || rooms.obstacles_per_room.len() < total {
            return Err(ConfigError::Invalid(format!(
                "room tables must cover all {total} rooms ({} enemy counts, {} obstacle counts)",
                rooms.enemies_per_room.len(),
                rooms.obstacles_per_room.len()
            )));
        }
        if let Some(room) = rooms.enemies_per_room[..total].iter().position(|&count| count == 0) {
            return Err(ConfigError::Invalid(format!("room {} requires no kills", room + 1)));
        }
        Ok(())
    }
}
