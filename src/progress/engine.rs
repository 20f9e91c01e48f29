//! Progress engine
//!
//! Every change goes through [`apply`], a pure `(previous, action) -> next`
//! reducer, so queued mutations always build on the latest profile. The engine
//! applies the change in memory first, re-checks achievements, then hands the
//! result to the store. A failed write is logged; the in-memory profile stays.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::achievements::{ACHIEVEMENTS, AchievementDef, AchievementProgress, calculate_progress};
use super::planets::{self, PlanetStatus};
use super::profile::{MissionStats, UserAchievement, UserProfile, level_for_xp};
use crate::now_ms;
use crate::persistence::ProfileStore;

/// A state change request
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Add XP, count a finished mission, merge stats
    CompleteMission { xp: u64, stats: Option<MissionStats> },
    /// Merge stats without counting a mission (partial multi-stage planets)
    RecordStats(MissionStats),
    UnlockPlanet(u32),
    /// Replace the completed sub-mission set of a planet
    SavePlanetProgress { planet_id: u32, completed: BTreeSet<u32> },
    UnlockAchievement { id: String, unlocked_at: f64 },
}

/// Pure reducer
pub fn apply(prev: &UserProfile, action: &Action) -> UserProfile {
    let mut next = prev.clone();
    match action {
        Action::CompleteMission { xp, stats } => {
            next.xp = next.xp.saturating_add(*xp);
            next.level = level_for_xp(next.xp);
            next.completed_missions += 1;
            if let Some(stats) = stats {
                next.stats.merge(stats);
            }
            next.has_started_journey = true;
        }
        Action::RecordStats(stats) => {
            next.stats.merge(stats);
            next.has_started_journey = true;
        }
        Action::UnlockPlanet(planet_id) => {
            next.unlocked_planets.insert(*planet_id);
        }
        Action::SavePlanetProgress {
            planet_id,
            completed,
        } => {
            next.planet_missions.insert(*planet_id, completed.clone());
        }
        Action::UnlockAchievement { id, unlocked_at } => {
            if !next.has_achievement(id) {
                next.achievements.push(UserAchievement {
                    achievement_id: id.clone(),
                    unlocked_at: *unlocked_at,
                });
            }
        }
    }
    next
}

/// What a mission completion did, for the UI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionOutcome {
    /// XP granted by this call (0 for an intermediate sub-mission)
    pub xp_awarded: u64,
    pub planet_complete: bool,
    pub unlocked_planet: Option<u32>,
    pub leveled_up: bool,
    /// Achievement IDs unlocked by this call, for the celebration modal
    pub new_achievements: Vec<String>,
}

/// Owns the profile and its mutation surface
pub struct ProgressEngine<S: ProfileStore> {
    profile: Option<UserProfile>,
    store: S,
    clock: fn() -> f64,
}

impl<S: ProfileStore> ProgressEngine<S> {
    /// Engine with no active profile
    pub fn new(store: S) -> Self {
        Self {
            profile: None,
            store,
            clock: now_ms,
        }
    }

    /// Engine with the store's saved profile, if any
    pub fn load(store: S) -> Self {
        let profile = match store.fetch_profile() {
            Ok(Some(profile)) => {
                log::info!("Loaded profile {} (xp {})", profile.name, profile.xp);
                Some(profile)
            }
            Ok(None) => {
                log::info!("No saved profile found");
                None
            }
            Err(e) => {
                log::warn!("Failed to load profile: {}", e);
                None
            }
        };
        Self {
            profile,
            store,
            clock: now_ms,
        }
    }

    /// Replace the timestamp source used for unlock dates
    pub fn with_clock(mut self, clock: fn() -> f64) -> Self {
        self.clock = clock;
        self
    }

    /// Start a session with a profile (registration or guest start)
    pub fn start_session(&mut self, profile: UserProfile) {
        log::info!("Session started for {}", profile.name);
        self.profile = Some(profile);
        self.persist();
    }

    /// Drop the active profile; later mutations become no-ops
    pub fn end_session(&mut self) -> Option<UserProfile> {
        self.profile.take()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply an action to the latest profile. Returns false without a profile.
    pub fn dispatch(&mut self, action: Action) -> bool {
        match &self.profile {
            Some(prev) => {
                self.profile = Some(apply(prev, &action));
                true
            }
            None => {
                log::debug!("Ignoring {:?}: no active profile", action);
                false
            }
        }
    }

    fn persist(&mut self) {
        if let Some(profile) = &self.profile {
            if let Err(e) = self.store.persist(profile) {
                log::warn!("Failed to persist profile (kept in memory): {}", e);
            }
        }
    }

    /// Add XP and count a finished mission. No dedup: call once per completion.
    pub fn complete_mission(&mut self, xp: u64, stats: Option<MissionStats>) -> Vec<String> {
        if !self.dispatch(Action::CompleteMission { xp, stats }) {
            return Vec::new();
        }
        let unlocked = self.unlock_met_achievements();
        self.persist();
        unlocked
    }

    /// Open a planet. Re-unlocking is harmless.
    pub fn unlock_planet(&mut self, planet_id: u32) -> Vec<String> {
        let was_open = self
            .profile
            .as_ref()
            .is_some_and(|p| p.is_planet_unlocked(planet_id));
        if !self.dispatch(Action::UnlockPlanet(planet_id)) {
            return Vec::new();
        }
        if !was_open {
            log::info!("Planet {} unlocked", planet_id);
        }
        let unlocked = self.unlock_met_achievements();
        self.persist();
        unlocked
    }

    /// Record completed sub-missions of a multi-stage planet. Grants no XP.
    pub fn save_planet_progress(&mut self, planet_id: u32, completed: BTreeSet<u32>) {
        if self.dispatch(Action::SavePlanetProgress {
            planet_id,
            completed,
        }) {
            self.persist();
        }
    }

    pub fn get_planet_progress(&self, planet_id: u32) -> BTreeSet<u32> {
        self.profile
            .as_ref()
            .map(|p| p.planet_progress(planet_id))
            .unwrap_or_default()
    }

    pub fn planet_status(&self, planet_id: u32) -> Option<PlanetStatus> {
        planets::planet_status(self.profile.as_ref()?, planet_id)
    }

    /// Unlock every achievement whose condition is now met. Returns the new IDs.
    pub fn check_achievements(&mut self) -> Vec<String> {
        let unlocked = self.unlock_met_achievements();
        if !unlocked.is_empty() {
            self.persist();
        }
        unlocked
    }

    fn unlock_met_achievements(&mut self) -> Vec<String> {
        let Some(profile) = &self.profile else {
            return Vec::new();
        };
        let due: Vec<&AchievementDef> = ACHIEVEMENTS
            .iter()
            .filter(|def| !profile.has_achievement(def.id) && def.condition.is_met(profile))
            .collect();

        let now = (self.clock)();
        due.into_iter()
            .map(|def| {
                log::info!("Achievement unlocked: {} ({})", def.name, def.tier.display_name());
                self.dispatch(Action::UnlockAchievement {
                    id: def.id.to_string(),
                    unlocked_at: now,
                });
                def.id.to_string()
            })
            .collect()
    }

    /// Display progress for every achievement, in catalog order
    pub fn achievement_progress(&self) -> Vec<(&'static AchievementDef, AchievementProgress)> {
        let Some(profile) = &self.profile else {
            return Vec::new();
        };
        ACHIEVEMENTS
            .iter()
            .map(|def| (def, calculate_progress(def, profile)))
            .collect()
    }

    /// Mission-screen entry point: record a finished (sub-)mission.
    ///
    /// The planet's XP is granted in one lump, and the next planet opened,
    /// only when its last outstanding sub-mission is recorded. Repeating an
    /// already-recorded sub-mission grants nothing.
    pub fn complete_planet_mission(
        &mut self,
        planet_id: u32,
        sub_mission: u32,
        stats: Option<MissionStats>,
    ) -> MissionOutcome {
        let Some(profile) = &self.profile else {
            return MissionOutcome::default();
        };
        let Some(planet) = planets::find(planet_id) else {
            log::warn!("Unknown planet {}", planet_id);
            return MissionOutcome::default();
        };
        if !profile.is_planet_unlocked(planet_id) {
            log::warn!("Planet {} is locked; ignoring mission {}", planet_id, sub_mission);
            return MissionOutcome::default();
        }
        if !planet.has_sub_mission(sub_mission) {
            log::warn!("Planet {} has no sub-mission {}", planet_id, sub_mission);
            return MissionOutcome::default();
        }

        let mut completed = profile.planet_progress(planet_id);
        if planet.is_covered_by(&completed) {
            log::debug!("Planet {} already complete", planet_id);
            return MissionOutcome {
                planet_complete: true,
                ..MissionOutcome::default()
            };
        }
        if !completed.insert(sub_mission) {
            log::debug!("Planet {} sub-mission {} already recorded", planet_id, sub_mission);
            return MissionOutcome::default();
        }
        let level_before = profile.level;

        if !planet.is_covered_by(&completed) {
            // Stats merge lands in memory before the save below persists it
            let had_stats = stats.is_some();
            if let Some(stats) = stats {
                self.dispatch(Action::RecordStats(stats));
            }
            self.save_planet_progress(planet_id, completed);
            let new_achievements = if had_stats {
                self.check_achievements()
            } else {
                Vec::new()
            };
            return MissionOutcome {
                new_achievements,
                ..MissionOutcome::default()
            };
        }

        self.save_planet_progress(planet_id, completed);

        let xp = planet.total_xp();
        log::info!("Planet {} complete: +{} XP", planet_id, xp);
        let mut new_achievements = self.complete_mission(xp, stats);

        let unlocked_planet = planet.next().map(|next| next.id);
        if let Some(next_id) = unlocked_planet {
            new_achievements.extend(self.unlock_planet(next_id));
        }

        let level_after = self.profile.as_ref().map_or(level_before, |p| p.level);
        MissionOutcome {
            xp_awarded: xp,
            planet_complete: true,
            unlocked_planet,
            leveled_up: level_after > level_before,
            new_achievements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn fixed_clock() -> f64 {
        1_700_000_000_000.0
    }

    fn engine() -> ProgressEngine<MemoryStore> {
        let mut engine = ProgressEngine::new(MemoryStore::new()).with_clock(fixed_clock);
        engine.start_session(UserProfile::new("Ada", "rocket"));
        engine
    }

    #[test]
    fn test_first_mission_unlocks_first_journey() {
        let mut engine = engine();
        let unlocked = engine.complete_mission(150, None);
        let profile = engine.profile().unwrap();
        assert_eq!(profile.xp, 150);
        assert_eq!(profile.level, 1);
        assert_eq!(profile.completed_missions, 1);
        assert!(profile.has_started_journey);
        assert!(unlocked.contains(&"first-journey".to_string()));
        assert_eq!(profile.achievements[0].unlocked_at, fixed_clock());
    }

    #[test]
    fn test_level_recomputed_from_xp() {
        let mut engine = engine();
        engine.complete_mission(999, None);
        assert_eq!(engine.profile().unwrap().level, 1);
        engine.complete_mission(1, None);
        assert_eq!(engine.profile().unwrap().level, 2);
        engine.complete_mission(1500, None);
        assert_eq!(engine.profile().unwrap().level, 3);
    }

    #[test]
    fn test_unlock_planet_twice_keeps_one_entry() {
        let mut engine = engine();
        engine.unlock_planet(2);
        engine.unlock_planet(2);
        let planets: Vec<u32> = engine.profile().unwrap().unlocked_planets.iter().copied().collect();
        assert_eq!(planets, vec![1, 2]);
    }

    #[test]
    fn test_achievements_never_duplicated_or_removed() {
        let mut engine = engine();
        engine.complete_mission(600, Some(MissionStats::perfect()));
        let first: Vec<String> = engine
            .profile()
            .unwrap()
            .achievements
            .iter()
            .map(|a| a.achievement_id.clone())
            .collect();
        assert!(!first.is_empty());

        for _ in 0..3 {
            assert!(engine.check_achievements().is_empty());
        }
        engine.complete_mission(0, None);
        let after = &engine.profile().unwrap().achievements;
        for id in &first {
            assert_eq!(after.iter().filter(|a| &a.achievement_id == id).count(), 1);
        }
    }

    #[test]
    fn test_stats_merge_feeds_knowledge_achievements() {
        let mut engine = engine();
        engine.complete_mission(100, Some(MissionStats::default().with_correct("angles", 6)));
        assert!(!engine.profile().unwrap().has_achievement("angle-ace"));
        let unlocked = engine.complete_mission(100, Some(MissionStats::default().with_correct("angles", 4)));
        assert!(unlocked.contains(&"angle-ace".to_string()));
        assert_eq!(engine.profile().unwrap().stats.correct_in("angles"), 10);
    }

    #[test]
    fn test_multi_stage_planet_grants_lump_sum() {
        let mut engine = engine();
        engine.unlock_planet(2);
        engine.unlock_planet(3);
        let before = engine.profile().unwrap().clone();

        let first = engine.complete_planet_mission(3, 1, None);
        let second = engine.complete_planet_mission(3, 2, None);
        let profile = engine.profile().unwrap();
        assert_eq!(first.xp_awarded, 0);
        assert_eq!(second.xp_awarded, 0);
        assert_eq!(profile.xp, before.xp);
        assert_eq!(profile.completed_missions, before.completed_missions);
        assert!(!profile.is_planet_unlocked(4));
        assert_eq!(engine.get_planet_progress(3), BTreeSet::from([1, 2]));

        let third = engine.complete_planet_mission(3, 3, None);
        let profile = engine.profile().unwrap();
        assert_eq!(third.xp_awarded, 550);
        assert!(third.planet_complete);
        assert_eq!(third.unlocked_planet, Some(4));
        assert_eq!(profile.xp, before.xp + 550);
        assert_eq!(profile.completed_missions, before.completed_missions + 1);
        assert!(profile.is_planet_unlocked(4));
        assert_eq!(engine.planet_status(3), Some(PlanetStatus::Complete));
    }

    #[test]
    fn test_repeated_sub_mission_grants_nothing() {
        let mut engine = engine();
        engine.unlock_planet(3);
        engine.complete_planet_mission(3, 1, None);
        assert_eq!(engine.complete_planet_mission(3, 1, None), MissionOutcome::default());

        engine.complete_planet_mission(3, 2, None);
        engine.complete_planet_mission(3, 3, None);
        let xp = engine.profile().unwrap().xp;
        let again = engine.complete_planet_mission(3, 3, None);
        assert_eq!(again.xp_awarded, 0);
        assert!(again.planet_complete);
        assert_eq!(engine.profile().unwrap().xp, xp);
    }

    #[test]
    fn test_intermediate_sub_mission_stats_are_saved() {
        let mut engine = engine();
        engine.unlock_planet(3);
        let stats = MissionStats::default().with_correct("quadrilaterals", 2);
        let outcome = engine.complete_planet_mission(3, 1, Some(stats));
        assert_eq!(outcome.xp_awarded, 0);

        let saved = engine.store().fetch_profile().unwrap().unwrap();
        assert_eq!(engine.profile().unwrap().stats.correct_in("quadrilaterals"), 2);
        assert_eq!(saved.stats.correct_in("quadrilaterals"), 2);
        assert_eq!(saved.planet_progress(3), BTreeSet::from([1]));
    }

    #[test]
    fn test_load_resumes_saved_profile() {
        let mut profile = UserProfile::new("Ada", "rocket");
        profile.xp = 1200;
        profile.level = 2;
        profile.unlocked_planets.insert(2);
        let store = MemoryStore::with_profile(&profile).unwrap();

        let mut engine = ProgressEngine::load(store).with_clock(fixed_clock);
        assert_eq!(engine.profile(), Some(&profile));

        let outcome = engine.complete_planet_mission(2, 1, None);
        assert_eq!(outcome.xp_awarded, 200);
        assert_eq!(engine.profile().unwrap().xp, 1400);
        assert_eq!(engine.store().writes, 3);
    }

    #[test]
    fn test_single_planet_mission_unlocks_next() {
        let mut engine = engine();
        let outcome = engine.complete_planet_mission(1, 1, None);
        assert_eq!(outcome.xp_awarded, 150);
        assert_eq!(outcome.unlocked_planet, Some(2));
        assert!(outcome.new_achievements.contains(&"first-journey".to_string()));
        assert!(outcome.new_achievements.contains(&"planet-hopper".to_string()));
    }

    #[test]
    fn test_locked_planet_is_ignored() {
        let mut engine = engine();
        assert_eq!(engine.complete_planet_mission(3, 1, None), MissionOutcome::default());
        assert!(engine.get_planet_progress(3).is_empty());
        assert_eq!(engine.complete_planet_mission(1, 2, None), MissionOutcome::default());
    }

    #[test]
    fn test_full_journey_unlocks_legendary() {
        let mut engine = engine();
        for planet in planets::PLANETS {
            for sub in 1..=planet.sub_mission_count() {
                engine.complete_planet_mission(planet.id, sub, Some(MissionStats::perfect()));
            }
        }
        let profile = engine.profile().unwrap();
        assert_eq!(profile.completed_missions, 4);
        assert_eq!(profile.xp, 150 + 200 + 550 + 1050);
        assert!(profile.has_achievement("galaxy-master"));
        assert!(profile.has_achievement("star-navigator"));
        assert!(profile.has_achievement("perfectionist"));
        assert_eq!(profile.stats.perfect_missions, 11);
    }

    #[test]
    fn test_missing_profile_is_noop() {
        let mut engine = ProgressEngine::new(MemoryStore::new());
        assert!(engine.complete_mission(100, None).is_empty());
        assert!(engine.unlock_planet(2).is_empty());
        engine.save_planet_progress(3, BTreeSet::from([1]));
        assert!(engine.check_achievements().is_empty());
        assert!(engine.get_planet_progress(3).is_empty());
        assert!(engine.profile().is_none());
        assert_eq!(engine.store().writes, 0);
    }

    #[test]
    fn test_persist_failure_keeps_memory_state() {
        let mut engine = ProgressEngine::new(MemoryStore::failing());
        engine.start_session(UserProfile::guest());
        engine.complete_mission(300, None);
        assert_eq!(engine.profile().unwrap().xp, 300);
        assert!(engine.store().fetch_profile().unwrap().is_none());
    }

    #[test]
    fn test_state_persisted_after_mutation() {
        let mut engine = engine();
        engine.complete_mission(150, None);
        let saved = engine.store().fetch_profile().unwrap().unwrap();
        assert_eq!(&saved, engine.profile().unwrap());

        let reloaded = ProgressEngine::load(engine.store().clone());
        assert_eq!(reloaded.profile(), engine.profile());
    }

    #[test]
    fn test_reducer_builds_on_latest_state() {
        let start = UserProfile::new("Ada", "rocket");
        let actions = [
            Action::CompleteMission { xp: 700, stats: None },
            Action::CompleteMission { xp: 700, stats: None },
            Action::UnlockPlanet(2),
        ];
        let end = actions.iter().fold(start, |state, action| apply(&state, action));
        assert_eq!(end.xp, 1400);
        assert_eq!(end.level, 2);
        assert_eq!(end.completed_missions, 2);
        assert!(end.is_planet_unlocked(2));
    }

    #[test]
    fn test_progress_display_does_not_mutate() {
        let mut engine = engine();
        engine.complete_mission(250, None);
        let before = engine.profile().unwrap().clone();
        let progress = engine.achievement_progress();
        assert_eq!(progress.len(), ACHIEVEMENTS.len());
        assert_eq!(engine.profile().unwrap(), &before);
    }
}
