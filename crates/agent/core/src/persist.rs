//! Versioned save record exchanged with the persistence layer.
//!
//! The record is plain data; encoding and storage are the runtime's concern.
//! Loading is best-effort: an outdated version or a model that does not fit the
//! current configuration yields a fresh agent instead of an error.

use crate::policy::PolicyModel;

/// Learned state carried across sessions.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SaveRecord {
    pub version: u32,
    pub policy: PolicyModel,
    pub foods_eaten: u64,
    pub deaths: u64,
    pub age: u64,
    pub epsilon: f64,
}

impl SaveRecord {
    /// Format version written by this build; other versions are ignored.
    pub const VERSION: u32 = 2;

    pub fn is_current(&self) -> bool {
        self.version == Self::VERSION
    }
}
