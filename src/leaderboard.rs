//! XP leaderboard
//!
//! One entry per player name, top 10 by XP. Persisted to LocalStorage on web.

use serde::{Deserialize, Serialize};

use crate::progress::UserProfile;

/// Maximum number of leaderboard entries to keep
pub const MAX_ENTRIES: usize = 10;

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub avatar: String,
    pub xp: u64,
    pub level: u32,
    pub achievements: usize,
}

impl LeaderboardEntry {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            avatar: profile.avatar.clone(),
            xp: profile.xp,
            level: profile.level,
            achievements: profile.achievement_count(),
        }
    }
}

/// Leaderboard sorted by XP, descending
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "geo_quest_leaderboard";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if an XP total earns a place
    pub fn qualifies(&self, xp: u64) -> bool {
        if xp == 0 {
            return false;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().map(|e| xp > e.xp).unwrap_or(true)
    }

    /// Insert or update a player's row. Returns the 1-indexed rank, or None
    /// if the entry doesn't qualify or the player already has a higher total.
    pub fn submit(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        if let Some(i) = self.entries.iter().position(|e| e.name == entry.name) {
            if self.entries[i].xp >= entry.xp {
                return None;
            }
            self.entries.remove(i);
        }
        if !self.qualifies(entry.xp) {
            return None;
        }

        // Find insertion point (sorted descending by XP, ties keep earlier entry first)
        let pos = self.entries.iter().position(|e| entry.xp > e.xp);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_ENTRIES);

        Some(rank)
    }

    /// Rank of a player (1-indexed)
    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name).map(|i| i + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_xp(&self) -> Option<u64> {
        self.entries.first().map(|e| e.xp)
    }

    /// Load from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(board) = serde_json::from_str::<Leaderboard>(&json) {
                    log::info!("Loaded {} leaderboard entries", board.entries.len());
                    return board;
                }
            }
        }

        log::info!("No leaderboard found, starting fresh");
        Self::new()
    }

    /// Save to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Leaderboard saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
