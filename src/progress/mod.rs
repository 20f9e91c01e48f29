//! Progress and achievements
//!
//! The profile is only changed through [`engine::apply`]; achievement rules
//! are re-evaluated after every mission completion and planet unlock.

pub mod achievements;
pub mod engine;
pub mod planets;
pub mod profile;

pub use achievements::{
    ACHIEVEMENTS, AchievementDef, AchievementProgress, Category, Condition, Tier, calculate_progress,
};
pub use engine::{Action, MissionOutcome, ProgressEngine, apply};
pub use planets::{PLANETS, PlanetDef, PlanetStatus, planet_status};
pub use profile::{MissionStats, UserAchievement, UserProfile, level_for_xp};
