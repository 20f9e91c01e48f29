//! Browser LocalStorage store (wasm32)

use super::{ProfileStore, SaveEnvelope, StoreError};
use crate::now_ms;
use crate::progress::UserProfile;

#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new(Self::STORAGE_KEY)
    }
}

impl LocalStorageStore {
    /// Default LocalStorage key
    pub const STORAGE_KEY: &'static str = "geo_quest_profile";

    pub fn new(key: &str) -> Self {
        Self { key: key.to_string() }
    }

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StoreError::Unavailable("LocalStorage not available".to_string()))
    }
}

impl ProfileStore for LocalStorageStore {
    fn fetch_profile(&self) -> Result<Option<UserProfile>, StoreError> {
        let storage = Self::storage()?;
        match storage.get_item(&self.key) {
            Ok(Some(json)) => SaveEnvelope::decode(&json).map(Some),
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Unavailable(format!("{e:?}"))),
        }
    }

    fn persist(&mut self, profile: &UserProfile) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        let json = SaveEnvelope::encode(profile, now_ms())?;
        storage
            .set_item(&self.key, &json)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?;
        log::info!("Profile saved (xp {})", profile.xp);
        Ok(())
    }
}
