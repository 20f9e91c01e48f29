//! Player settings and validator tolerances
//!
//! Persisted separately from the profile in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Difficulty presets controlling how forgiving shape checks are
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Relaxed,
    #[default]
    Standard,
    Strict,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Relaxed => "Relaxed",
            Difficulty::Standard => "Standard",
            Difficulty::Strict => "Strict",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "relaxed" | "easy" => Some(Difficulty::Relaxed),
            "standard" | "normal" => Some(Difficulty::Standard),
            "strict" | "hard" => Some(Difficulty::Strict),
            _ => None,
        }
    }

    /// Relative side tolerance for this preset
    pub fn side_tolerance(&self) -> f64 {
        match self {
            Difficulty::Relaxed => 0.12,
            Difficulty::Standard => SIDE_TOLERANCE,
            Difficulty::Strict => 0.05,
        }
    }

    /// Right-angle tolerance in degrees
    pub fn angle_tolerance_deg(&self) -> f64 {
        match self {
            Difficulty::Relaxed => 8.0,
            Difficulty::Standard => ANGLE_TOLERANCE_DEG,
            Difficulty::Strict => 3.0,
        }
    }

    pub fn validator(&self) -> ValidatorConfig {
        ValidatorConfig {
            side_tolerance: self.side_tolerance(),
            angle_tolerance_deg: self.angle_tolerance_deg(),
            ..ValidatorConfig::default()
        }
    }
}

/// Thresholds used by the shape classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Every side must be longer than this
    pub min_side: f64,
    /// Relative tolerance for "equal" sides
    pub side_tolerance: f64,
    /// Max deviation from the expected angle, in degrees
    pub angle_tolerance_deg: f64,
    /// Adjacent-side difference that separates a rectangle from a square
    pub not_square_margin: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            min_side: MIN_SIDE_LENGTH,
            side_tolerance: SIDE_TOLERANCE,
            angle_tolerance_deg: ANGLE_TOLERANCE_DEG,
            not_square_margin: NOT_SQUARE_MARGIN,
        }
    }
}

/// Player settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Tolerance preset
    pub difficulty: Difficulty,

    // === Feedback ===
    /// Show live side lengths and angles while dragging
    pub show_measurements: bool,
    /// Show the score as a percentage after each attempt
    pub show_score: bool,

    // === Accessibility ===
    /// Reduced motion (skip unlock celebrations)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Standard,
            show_measurements: true,
            show_score: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a difficulty preset
    pub fn from_preset(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Validator thresholds for the current preset
    pub fn validator(&self) -> ValidatorConfig {
        self.difficulty.validator()
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "geo_quest_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
