//! In-memory store for tests, guests and native demos

use super::{ProfileStore, SaveEnvelope, StoreError};
use crate::now_ms;
use crate::progress::UserProfile;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Last saved envelope JSON
    saved: Option<String>,
    /// Number of successful writes
    pub writes: usize,
    /// Simulate an unreachable backend
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a profile
    pub fn with_profile(profile: &UserProfile) -> Result<Self, StoreError> {
        Ok(Self {
            saved: Some(SaveEnvelope::encode(profile, now_ms())?),
            ..Self::default()
        })
    }

    /// Store whose writes always fail
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }
}

impl ProfileStore for MemoryStore {
    fn fetch_profile(&self) -> Result<Option<UserProfile>, StoreError> {
        self.saved.as_deref().map(SaveEnvelope::decode).transpose()
    }

    fn persist(&mut self, profile: &UserProfile) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable("memory store set to fail".to_string()));
        }
        self.saved = Some(SaveEnvelope::encode(profile, now_ms())?);
        self.writes += 1;
        Ok(())
    }
}
