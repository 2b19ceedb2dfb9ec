//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services.
//! Nothing in this crate reads environment variables during request handling; the host reads
//! them and hands the raw values to the helpers below.

use crate::constants::DEFAULT_STORAGE_LOCATION;
use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreConfig {
    storage_location: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The storage location may be relative (resolved against the working directory when the
    /// storage root is initialised) or absolute.
    pub fn new(storage_location: PathBuf) -> CoreResult<Self> {
        if storage_location.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(CoreError::InvalidInput("storage location cannot be empty".into()));
        }

        Ok(Self { storage_location })
    }

    pub fn storage_location(&self) -> &Path {
        &self.storage_location
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            storage_location: PathBuf::from(DEFAULT_STORAGE_LOCATION),
        }
    }
}

/// Resolve the storage location from an optional raw value (environment variable or flag).
///
/// If `value` is `None` or empty/whitespace, returns the default location (`uploads`).
pub fn storage_location_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_LOCATION))
}
