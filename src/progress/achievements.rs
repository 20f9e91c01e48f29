//! Achievement catalog and condition evaluation
//!
//! Each achievement carries one condition; the condition maps the profile to a
//! "current" number that unlocks the achievement once it reaches the threshold.

use serde::{Deserialize, Serialize};

use super::profile::UserProfile;

/// Reward rank of an achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Legendary,
}

impl Tier {
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
            Self::Legendary => "Legendary",
        }
    }
}

/// Grouping on the achievements screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Journey,
    Exploration,
    Experience,
    Mastery,
    Knowledge,
}

/// Unlock rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    MissionsCompleted { value: u64 },
    PlanetsUnlocked { value: u64 },
    XpEarned { value: u64 },
    LevelReached { value: u64 },
    PerfectMissions { value: u64 },
    FastCompletions { value: u64 },
    QuestionsCorrect { value: u64, category: &'static str },
    AllMissionsComplete,
}

impl Condition {
    /// Threshold the current value must reach
    pub fn threshold(&self) -> u64 {
        match *self {
            Condition::MissionsCompleted { value }
            | Condition::PlanetsUnlocked { value }
            | Condition::XpEarned { value }
            | Condition::LevelReached { value }
            | Condition::PerfectMissions { value }
            | Condition::FastCompletions { value }
            | Condition::QuestionsCorrect { value, .. } => value,
            Condition::AllMissionsComplete => 1,
        }
    }

    /// Unclamped progress value read from the profile
    pub fn current(&self, profile: &UserProfile) -> u64 {
        match *self {
            Condition::MissionsCompleted { .. } => profile.completed_missions as u64,
            Condition::PlanetsUnlocked { .. } => profile.unlocked_planets.len() as u64,
            Condition::XpEarned { .. } => profile.xp,
            Condition::LevelReached { .. } => profile.level as u64,
            Condition::PerfectMissions { .. } => profile.stats.perfect_missions as u64,
            Condition::FastCompletions { .. } => profile.stats.fast_completions as u64,
            Condition::QuestionsCorrect { category, .. } => profile.stats.correct_in(category) as u64,
            Condition::AllMissionsComplete => {
                u64::from(profile.completed_missions >= profile.total_missions)
            }
        }
    }

    pub fn is_met(&self, profile: &UserProfile) -> bool {
        self.current(profile) >= self.threshold()
    }
}

/// Static catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub tier: Tier,
    pub category: Category,
    /// Shown on the badge; unlocking does not add XP
    pub xp_reward: u64,
    pub condition: Condition,
}

/// Progress toward one achievement, for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementProgress {
    /// Clamped to `total`
    pub current: u64,
    pub total: u64,
    pub is_unlocked: bool,
}

impl AchievementProgress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.current as f64 / self.total as f64
    }
}

/// Progress for display. Pure: reads the profile, changes nothing.
pub fn calculate_progress(def: &AchievementDef, profile: &UserProfile) -> AchievementProgress {
    let total = def.condition.threshold();
    AchievementProgress {
        current: def.condition.current(profile).min(total),
        total,
        is_unlocked: profile.has_achievement(def.id),
    }
}

pub fn find(id: &str) -> Option<&'static AchievementDef> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

const fn def(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    tier: Tier,
    category: Category,
    xp_reward: u64,
    condition: Condition,
) -> AchievementDef {
    AchievementDef {
        id,
        name,
        description,
        tier,
        category,
        xp_reward,
        condition,
    }
}

/// All achievements
pub const ACHIEVEMENTS: &[AchievementDef] = &[
    // Journey
    def(
        "first-journey",
        "First Journey",
        "Complete your first mission",
        Tier::Bronze,
        Category::Journey,
        50,
        Condition::MissionsCompleted { value: 1 },
    ),
    def(
        "halfway-there",
        "Halfway There",
        "Complete two planet missions",
        Tier::Silver,
        Category::Journey,
        100,
        Condition::MissionsCompleted { value: 2 },
    ),
    def(
        "galaxy-master",
        "Galaxy Master",
        "Complete every planet",
        Tier::Legendary,
        Category::Journey,
        1000,
        Condition::AllMissionsComplete,
    ),
    // Exploration
    def(
        "planet-hopper",
        "Planet Hopper",
        "Unlock a second planet",
        Tier::Bronze,
        Category::Exploration,
        50,
        Condition::PlanetsUnlocked { value: 2 },
    ),
    def(
        "star-navigator",
        "Star Navigator",
        "Unlock all four planets",
        Tier::Gold,
        Category::Exploration,
        250,
        Condition::PlanetsUnlocked { value: 4 },
    ),
    // Experience
    def(
        "rising-star",
        "Rising Star",
        "Earn 500 XP",
        Tier::Bronze,
        Category::Experience,
        50,
        Condition::XpEarned { value: 500 },
    ),
    def(
        "stellar-scholar",
        "Stellar Scholar",
        "Earn 2000 XP",
        Tier::Silver,
        Category::Experience,
        100,
        Condition::XpEarned { value: 2000 },
    ),
    def(
        "cadet-commander",
        "Cadet Commander",
        "Reach level 3",
        Tier::Silver,
        Category::Experience,
        100,
        Condition::LevelReached { value: 3 },
    ),
    // Mastery
    def(
        "flawless",
        "Flawless",
        "Finish a mission without a mistake",
        Tier::Bronze,
        Category::Mastery,
        50,
        Condition::PerfectMissions { value: 1 },
    ),
    def(
        "perfectionist",
        "Perfectionist",
        "Finish four missions without a mistake",
        Tier::Platinum,
        Category::Mastery,
        500,
        Condition::PerfectMissions { value: 4 },
    ),
    def(
        "light-speed",
        "Light Speed",
        "Beat the par time three times",
        Tier::Silver,
        Category::Mastery,
        100,
        Condition::FastCompletions { value: 3 },
    ),
    // Knowledge
    def(
        "angle-ace",
        "Angle Ace",
        "Answer 10 angle questions correctly",
        Tier::Silver,
        Category::Knowledge,
        100,
        Condition::QuestionsCorrect {
            value: 10,
            category: "angles",
        },
    ),
    def(
        "polygon-pro",
        "Polygon Pro",
        "Answer 10 polygon questions correctly",
        Tier::Gold,
        Category::Knowledge,
        250,
        Condition::QuestionsCorrect {
            value: 10,
            category: "polygons",
        },
    ),
    def(
        "shape-shifter",
        "Shape Shifter",
        "Build 6 quadrilaterals correctly",
        Tier::Gold,
        Category::Knowledge,
        250,
        Condition::QuestionsCorrect {
            value: 6,
            category: "quadrilaterals",
        },
    ),
];
