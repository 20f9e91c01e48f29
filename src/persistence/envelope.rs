//! Versioned save format

use serde::{Deserialize, Serialize};

use super::StoreError;
use crate::progress::UserProfile;

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

/// JSON wrapper around a saved profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveEnvelope {
    pub version: u32,
    /// Unix timestamp (ms) of the write
    pub saved_at: f64,
    pub profile: UserProfile,
}

impl SaveEnvelope {
    pub fn new(profile: UserProfile, saved_at: f64) -> Self {
        Self {
            version: SAVE_VERSION,
            saved_at,
            profile,
        }
    }

    /// Serialize a profile for storage
    pub fn encode(profile: &UserProfile, saved_at: f64) -> Result<String, StoreError> {
        Ok(serde_json::to_string(&Self::new(profile.clone(), saved_at))?)
    }

    /// Parse stored JSON. Accepts an envelope or a bare profile (version 0).
    pub fn decode(json: &str) -> Result<UserProfile, StoreError> {
        match serde_json::from_str::<SaveEnvelope>(json) {
            Ok(envelope) if envelope.version > SAVE_VERSION => Err(StoreError::UnsupportedVersion {
                found: envelope.version,
                supported: SAVE_VERSION,
            }),
            Ok(envelope) => Ok(envelope.profile),
            Err(envelope_err) => match serde_json::from_str::<UserProfile>(json) {
                Ok(profile) => {
                    log::info!("Migrating unversioned save for {}", profile.name);
                    Ok(profile)
                }
                Err(_) => Err(envelope_err.into()),
            },
        }
    }
}
