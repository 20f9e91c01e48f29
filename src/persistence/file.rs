//! JSON file store (native)

use std::fs;
use std::path::{Path, PathBuf};

use super::{ProfileStore, SaveEnvelope, StoreError};
use crate::now_ms;
use crate::progress::UserProfile;

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStore for FileStore {
    fn fetch_profile(&self) -> Result<Option<UserProfile>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        SaveEnvelope::decode(&json).map(Some)
    }

    /// Write to a temp file, then rename over the old save
    fn persist(&mut self, profile: &UserProfile) -> Result<(), StoreError> {
        let json = SaveEnvelope::encode(profile, now_ms())?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!("Profile saved to {}", self.path.display());
        Ok(())
    }
}
