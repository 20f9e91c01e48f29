//! Geo Quest - geometry missions across a chain of planets
//!
//! Core modules:
//! - `geometry`: Shape validation (side lengths, angles, classification)
//! - `progress`: Profile state, planet unlocks, achievement rules
//! - `persistence`: Profile store boundary with versioned saves
//! - `leaderboard`: Top players by XP
//! - `settings`: Player preferences and validator tolerances

pub mod geometry;
pub mod leaderboard;
pub mod persistence;
pub mod progress;
pub mod settings;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use leaderboard::Leaderboard;
pub use progress::{ProgressEngine, UserProfile};
pub use settings::{Difficulty, Settings, ValidatorConfig};

/// Game configuration constants
pub mod consts {
    /// Minimum side length for a non-degenerate quadrilateral (viewport units)
    pub const MIN_SIDE_LENGTH: f64 = 10.0;
    /// Relative tolerance for side equality checks
    pub const SIDE_TOLERANCE: f64 = 0.08;
    /// Allowed deviation from 90° for a right angle (degrees)
    pub const ANGLE_TOLERANCE_DEG: f64 = 5.0;
    /// Adjacent sides of a rectangle must differ by more than this fraction of the smaller
    pub const NOT_SQUARE_MARGIN: f64 = 0.15;

    /// Score weights: validity + primary criterion + secondary criterion
    pub const SCORE_VALID: f64 = 0.4;
    pub const SCORE_PRIMARY: f64 = 0.3;
    pub const SCORE_SECONDARY: f64 = 0.3;

    /// XP needed per level
    pub const XP_PER_LEVEL: u64 = 1000;
    /// Number of top-level missions (one per planet)
    pub const TOTAL_MISSIONS: u32 = 4;
}

/// Current wall-clock time in milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Relative equality: `|a - b|` within `tolerance` of the reference length
#[inline]
pub fn approx_equal(a: f64, b: f64, reference: f64, tolerance: f64) -> bool {
    (a - b).abs() <= reference * tolerance
}
