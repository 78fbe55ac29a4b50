//! Budget usage persistence.
//!
//! The per-provider call counters and window start timestamps are written
//! to a small JSON file after each tick so a restart cannot launder quota.
//! Load failures are never fatal: the counters reset, which only makes the
//! tracker more conservative than the provider requires.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Usage file errors.
#[derive(Debug, Error)]
pub enum UsageError {
    /// Failed to serialize usage state
    #[error("failed to serialize usage state: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failed to write the usage file
    #[error("failed to write usage file: {0}")]
    Write(std::io::Error),
}

/// Persisted window state for one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderUsage {
    /// Calls consumed in the current window.
    pub count: u32,
    /// When the current window started.
    pub window_start: DateTime<Utc>,
}

/// On-disk usage state for all providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageState {
    pub position: ProviderUsage,
    pub schedule: ProviderUsage,
    pub weather: ProviderUsage,
}

impl UsageState {
    /// Load persisted usage, if any.
    ///
    /// A missing file is the normal first-run case; an unreadable or
    /// corrupt file resets the counters with a warning.
    pub fn load(path: &Path) -> Option<UsageState> {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(_) => return None,
        };

        match serde_json::from_slice(&data) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "usage file is corrupted, resetting call counters"
                );
                None
            }
        }
    }

    /// Write the usage state to disk.
    pub fn save(&self, path: &Path) -> Result<(), UsageError> {
        let data = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, data).map_err(UsageError::Write)
    }
}
