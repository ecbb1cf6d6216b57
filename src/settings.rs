//! Game settings and preferences
//!
//! Persisted separately from scores in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::platform::storage::{KeyValueStore, StorageError};

/// How the snake's colors change on each color timer firing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ColorMode {
    /// Hue cycles with wall-clock time, phase-shifted along the body
    #[default]
    Rainbow,
    /// A fresh random color for the whole snake
    Random,
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Rainbow => "Rainbow",
            ColorMode::Random => "Random",
        }
    }

    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            ColorMode::Rainbow => ColorMode::Random,
            ColorMode::Random => ColorMode::Rainbow,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub color_mode: ColorMode,

    // === Visuals ===
    /// Grass field behind the play area
    pub grass: bool,
    /// Hexagonal body segments (squares when off)
    pub hex_segments: bool,
    /// Pear-shaped head with eyes (square when off)
    pub pear_head: bool,

    // === Scores ===
    /// Ask for a name when a run makes the leaderboard
    pub ask_name: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::Rainbow,
            grass: true,
            hex_segments: true,
            pear_head: true,
            ask_name: true,
        }
    }
}

impl Settings {
    /// Plain squares everywhere, like the first version of the game
    pub fn classic() -> Self {
        Self {
            color_mode: ColorMode::Random,
            grass: false,
            hex_segments: false,
            pear_head: false,
            ask_name: false,
        }
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "snake_settings";

    pub fn load(store: &dyn KeyValueStore) -> Self {
        if let Some(json) = store.get(Self::STORAGE_KEY) {
            if let Ok(settings) = serde_json::from_str(&json) {
                log::info!("Loaded settings from storage");
                return settings;
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
