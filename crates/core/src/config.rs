//! Core runtime configuration.
//!
//! Resolved once at process startup and passed into the store, so request handling never reads
//! process-wide environment variables.

use crate::constants::{DEFAULT_SURGERY_DATA_DIR, SURGERIES_DIR_NAME};
use crate::{SurgeryError, SurgeryResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`SurgeryError::InvalidConfig`] if `data_dir` is empty or exists but is not a
    /// directory.
    pub fn new(data_dir: PathBuf) -> SurgeryResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(SurgeryError::InvalidConfig(
                "data directory cannot be empty".into(),
            ));
        }
        if data_dir.exists() && !data_dir.is_dir() {
            return Err(SurgeryError::InvalidConfig(format!(
                "data directory is not a directory: {}",
                data_dir.display()
            )));
        }

        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn surgeries_dir(&self) -> PathBuf {
        self.data_dir.join(SURGERIES_DIR_NAME)
    }
}

/// Resolve the data directory from an optional raw value (typically `SURGERY_DATA_DIR`).
///
/// `None` or a blank value falls back to [`DEFAULT_SURGERY_DATA_DIR`].
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SURGERY_DATA_DIR))
}
