//! Planet catalog and unlock state
//!
//! Planets open strictly in order 1 → 2 → 3 → 4. Planet 1 is always open;
//! planet K+1 opens when planet K's last sub-mission is done.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::profile::UserProfile;

/// Static planet definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanetDef {
    pub id: u32,
    pub name: &'static str,
    /// Geometry topic taught on this planet
    pub topic: &'static str,
    /// XP per sub-mission, in order; granted as one lump when all are done
    pub sub_mission_xp: &'static [u64],
}

impl PlanetDef {
    pub fn sub_mission_count(&self) -> u32 {
        self.sub_mission_xp.len() as u32
    }

    pub fn is_multi_stage(&self) -> bool {
        self.sub_mission_xp.len() > 1
    }

    /// Lump-sum XP for finishing the planet
    pub fn total_xp(&self) -> u64 {
        self.sub_mission_xp.iter().sum()
    }

    /// 1-based sub-mission index is in range
    pub fn has_sub_mission(&self, index: u32) -> bool {
        (1..=self.sub_mission_count()).contains(&index)
    }

    /// Every sub-mission appears in `completed`
    pub fn is_covered_by(&self, completed: &BTreeSet<u32>) -> bool {
        (1..=self.sub_mission_count()).all(|i| completed.contains(&i))
    }

    /// The planet this one unlocks
    pub fn next(&self) -> Option<&'static PlanetDef> {
        find(self.id + 1)
    }
}

pub const PLANETS: &[PlanetDef] = &[
    PlanetDef {
        id: 1,
        name: "Polygonia",
        topic: "Identifying polygons",
        sub_mission_xp: &[150],
    },
    PlanetDef {
        id: 2,
        name: "Angulus",
        topic: "Interior angle sums",
        sub_mission_xp: &[200],
    },
    PlanetDef {
        id: 3,
        name: "Quadra Prime",
        topic: "Building squares and rectangles",
        sub_mission_xp: &[150, 200, 200],
    },
    PlanetDef {
        id: 4,
        name: "Parallax",
        topic: "Quadrilateral properties",
        sub_mission_xp: &[100, 150, 150, 200, 200, 250],
    },
];

pub fn find(id: u32) -> Option<&'static PlanetDef> {
    PLANETS.iter().find(|p| p.id == id)
}

/// Where a planet sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PlanetStatus {
    Locked,
    Unlocked { completed: u32, total: u32 },
    Complete,
}

/// Status of a planet for this profile, `None` for an unknown planet ID.
///
/// A planet counts as complete when all its sub-missions are recorded, or
/// when the next planet is already open: unlocking K+1 is the consequence of
/// finishing K, and single-mission planets finished through a bare
/// `complete_mission` + `unlock_planet` never record a sub-mission.
pub fn planet_status(profile: &UserProfile, planet_id: u32) -> Option<PlanetStatus> {
    let planet = find(planet_id)?;
    if !profile.is_planet_unlocked(planet_id) {
        return Some(PlanetStatus::Locked);
    }

    let done = profile.planet_progress(planet_id);
    let next_open = planet
        .next()
        .is_some_and(|next| profile.is_planet_unlocked(next.id));
    if planet.is_covered_by(&done) || next_open {
        return Some(PlanetStatus::Complete);
    }

    let completed = done.iter().filter(|&&i| planet.has_sub_mission(i)).count() as u32;
    Some(PlanetStatus::Unlocked {
        completed,
        total: planet.sub_mission_count(),
    })
}
