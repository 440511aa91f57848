//! Run configuration
//!
//! Loaded once at session start from a JSON file. Missing or corrupt files
//! fall back to defaults so the simulation never sees a load failure.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::PlayerClass;
use crate::consts::MAX_WAVE;

/// Difficulty flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    /// Multiplier on boss projectile damage
    pub fn damage_multiplier(&self) -> f32 {
        match self {
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.3,
        }
    }

    /// Multiplier on boss projectile speed
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.15,
        }
    }

    /// Multiplier on boss max health
    pub fn health_multiplier(&self) -> f32 {
        match self {
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.5,
        }
    }
}

/// Session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub player_class: PlayerClass,
    /// Fixed run seed (random when absent)
    pub seed: Option<u64>,
    /// Wave to start from (clamped to 1..=100)
    pub starting_wave: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            player_class: PlayerClass::Warrior,
            seed: None,
            starting_wave: 1,
        }
    }
}

impl Settings {
    /// Starting wave clamped to the valid range
    pub fn effective_starting_wave(&self) -> u32 {
        self.starting_wave.clamp(1, MAX_WAVE)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from disk, substituting defaults on any failure
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Corrupt settings file {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::info!("No settings at {} ({}), using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
