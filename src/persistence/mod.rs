//! Profile persistence
//!
//! Features:
//! - Versioned JSON envelope
//! - Bare-profile migration for saves written before the envelope existed
//! - Stores: in-memory, file (native), LocalStorage (wasm32)
//!
//! The progress engine updates its in-memory profile first and persists
//! afterwards; a failed write is logged and never rolls the profile back.

pub mod envelope;
#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;
pub mod memory;

pub use envelope::{SAVE_VERSION, SaveEnvelope};
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;
pub use memory::MemoryStore;

use thiserror::Error;

use crate::progress::UserProfile;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Save version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Where profiles live between sessions
pub trait ProfileStore {
    /// Load the saved profile, `Ok(None)` when nothing has been saved yet
    fn fetch_profile(&self) -> Result<Option<UserProfile>, StoreError>;

    /// Save the profile, replacing whatever was there
    fn persist(&mut self, profile: &UserProfile) -> Result<(), StoreError>;
}
