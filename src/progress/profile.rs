//! The player's progress record

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::consts::{TOTAL_MISSIONS, XP_PER_LEVEL};

/// Level for a given XP total: one level per 1000 XP, starting at 1
pub fn level_for_xp(xp: u64) -> u32 {
    (xp / XP_PER_LEVEL) as u32 + 1
}

/// Per-mission stats merged into the profile on completion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionStats {
    /// Missions finished without a wrong answer
    #[serde(default)]
    pub perfect_missions: u32,
    /// Missions finished under the par time
    #[serde(default)]
    pub fast_completions: u32,
    /// Correct answers by question category
    #[serde(default)]
    pub questions_correct: BTreeMap<String, u32>,
}

impl MissionStats {
    pub fn perfect() -> Self {
        Self {
            perfect_missions: 1,
            ..Self::default()
        }
    }

    pub fn with_correct(mut self, category: &str, count: u32) -> Self {
        *self.questions_correct.entry(category.to_string()).or_default() += count;
        self
    }

    /// Additive merge, never overwrites
    pub fn merge(&mut self, other: &MissionStats) {
        self.perfect_missions += other.perfect_missions;
        self.fast_completions += other.fast_completions;
        for (category, count) in &other.questions_correct {
            *self.questions_correct.entry(category.clone()).or_default() += count;
        }
    }

    pub fn correct_in(&self, category: &str) -> u32 {
        self.questions_correct.get(category).copied().unwrap_or(0)
    }
}

/// An unlocked achievement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAchievement {
    pub achievement_id: String,
    /// Unix timestamp (ms) when unlocked
    pub unlocked_at: f64,
}

/// Authoritative progress record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub avatar: String,
    /// Guest profiles live only in local storage
    #[serde(default)]
    pub is_guest: bool,
    pub xp: u64,
    pub level: u32,
    pub completed_missions: u32,
    pub total_missions: u32,
    pub unlocked_planets: BTreeSet<u32>,
    /// Completed sub-missions per multi-stage planet
    #[serde(default)]
    pub planet_missions: BTreeMap<u32, BTreeSet<u32>>,
    #[serde(default)]
    pub stats: MissionStats,
    /// Unlock records, append-only, unique by ID
    #[serde(default)]
    pub achievements: Vec<UserAchievement>,
    #[serde(default)]
    pub has_started_journey: bool,
}

impl UserProfile {
    /// Fresh profile: zero progress, planet 1 open
    pub fn new(name: &str, avatar: &str) -> Self {
        Self {
            name: name.to_string(),
            avatar: avatar.to_string(),
            is_guest: false,
            xp: 0,
            level: 1,
            completed_missions: 0,
            total_missions: TOTAL_MISSIONS,
            unlocked_planets: BTreeSet::from([1]),
            planet_missions: BTreeMap::new(),
            stats: MissionStats::default(),
            achievements: Vec::new(),
            has_started_journey: false,
        }
    }

    pub fn guest() -> Self {
        Self {
            is_guest: true,
            ..Self::new("Guest", "astronaut")
        }
    }

    pub fn achievement_count(&self) -> usize {
        self.achievements.len()
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a.achievement_id == id)
    }

    pub fn is_planet_unlocked(&self, planet_id: u32) -> bool {
        self.unlocked_planets.contains(&planet_id)
    }

    /// Completed sub-missions of a planet (empty if none)
    pub fn planet_progress(&self, planet_id: u32) -> BTreeSet<u32> {
        self.planet_missions.get(&planet_id).cloned().unwrap_or_default()
    }
}
