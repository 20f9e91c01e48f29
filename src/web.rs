//! Browser bindings
//!
//! Thin JSON-in/JSON-out wrappers; the UI owns rendering and input capture.

use std::collections::BTreeMap;

use wasm_bindgen::prelude::*;

use crate::geometry::{self, AngleAsk, AngleQuestion, Point, QuadTarget};
use crate::leaderboard::{Leaderboard, LeaderboardEntry};
use crate::persistence::LocalStorageStore;
use crate::progress::{MissionStats, ProgressEngine, UserProfile};
use crate::settings::Settings;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Geo Quest core ready");
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Classify dragged points (`{"A": {"x":..,"y":..}, ...}`) against a target shape
#[wasm_bindgen]
pub fn classify_quad(points_json: &str, target: &str) -> Result<String, JsValue> {
    let points: BTreeMap<String, Point> =
        serde_json::from_str(points_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let target = QuadTarget::parse(target)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown target shape: {target}")))?;
    let result = geometry::classify_points(&points, target, &Settings::load().validator());
    to_js(&result)
}

/// Compare selected shape IDs with the answer key
#[wasm_bindgen]
pub fn check_selection(selected: Vec<u32>, correct: Vec<u32>) -> Result<String, JsValue> {
    to_js(&geometry::classify_selection(&selected, &correct))
}

fn parse_ask(ask: &str) -> Result<AngleAsk, JsValue> {
    AngleAsk::parse(ask).ok_or_else(|| JsValue::from_str(&format!("Unknown angle question: {ask}")))
}

/// Multiple-choice angle-sum question. Keep the seed to check the answer.
#[wasm_bindgen]
pub fn angle_question(sides: u32, ask: &str, seed: u64) -> Result<String, JsValue> {
    to_js(&AngleQuestion::from_seed(sides, parse_ask(ask)?, seed))
}

/// Exact-match check of the option the player picked
#[wasm_bindgen]
pub fn check_angle_answer(sides: u32, ask: &str, seed: u64, choice: usize) -> Result<bool, JsValue> {
    Ok(AngleQuestion::from_seed(sides, parse_ask(ask)?, seed).check(choice))
}

/// One player's session, backed by LocalStorage
#[wasm_bindgen]
pub struct GameSession {
    engine: ProgressEngine<LocalStorageStore>,
}

#[wasm_bindgen]
impl GameSession {
    /// Resume the saved profile, if there is one
    #[wasm_bindgen(constructor)]
    pub fn new() -> GameSession {
        GameSession {
            engine: ProgressEngine::load(LocalStorageStore::default()),
        }
    }

    pub fn has_profile(&self) -> bool {
        self.engine.profile().is_some()
    }

    pub fn start(&mut self, name: &str, avatar: &str) {
        self.engine.start_session(UserProfile::new(name, avatar));
    }

    pub fn start_guest(&mut self) {
        self.engine.start_session(UserProfile::guest());
    }

    /// Record a finished (sub-)mission; `stats_json` may be empty
    pub fn complete_planet_mission(
        &mut self,
        planet_id: u32,
        sub_mission: u32,
        stats_json: &str,
    ) -> Result<String, JsValue> {
        let stats = if stats_json.trim().is_empty() {
            None
        } else {
            Some(
                serde_json::from_str::<MissionStats>(stats_json)
                    .map_err(|e| JsValue::from_str(&e.to_string()))?,
            )
        };
        let outcome = self.engine.complete_planet_mission(planet_id, sub_mission, stats);
        if outcome.planet_complete && outcome.xp_awarded > 0 {
            self.submit_to_leaderboard();
        }
        to_js(&outcome)
    }

    pub fn planet_status(&self, planet_id: u32) -> Result<String, JsValue> {
        to_js(&self.engine.planet_status(planet_id))
    }

    pub fn profile(&self) -> Result<String, JsValue> {
        to_js(&self.engine.profile())
    }

    /// Catalog entries with progress, for the achievements screen
    pub fn achievements(&self) -> Result<String, JsValue> {
        let rows: Vec<serde_json::Value> = self
            .engine
            .achievement_progress()
            .into_iter()
            .map(|(def, progress)| serde_json::json!({ "achievement": def, "progress": progress }))
            .collect();
        to_js(&rows)
    }

    pub fn leaderboard(&self) -> Result<String, JsValue> {
        to_js(&Leaderboard::load())
    }
}

impl GameSession {
    fn submit_to_leaderboard(&self) {
        let Some(profile) = self.engine.profile() else {
            return;
        };
        if profile.is_guest {
            return;
        }
        let mut board = Leaderboard::load();
        if let Some(rank) = board.submit(LeaderboardEntry::from_profile(profile)) {
            log::info!("{} is now #{} on the leaderboard", profile.name, rank);
            board.save();
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
