//! Storage root initialisation.

use crate::{FilesError, FilesResult};
use std::fs;
use std::path::{Path, PathBuf};

/// The single confined directory all blobs are written into and read from.
///
/// A `StorageRoot` can only be obtained through [`StorageRoot::initialize`], so holding one
/// proves the directory existed when the process started. The stored path is absolute and
/// canonical; it is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageRoot {
    path: PathBuf,
}

impl StorageRoot {
    /// Creates the storage directory (and any missing ancestors) and resolves its absolute form.
    ///
    /// Safe to call when the directory already exists.
    ///
    /// # Arguments
    ///
    /// * `location` - Relative or absolute path of the storage directory
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::StorageInit`] if:
    /// - The directory or one of its ancestors cannot be created
    /// - The path cannot be canonicalised
    /// - The path exists but is not a directory
    ///
    /// The host is expected to treat this as fatal.
    pub fn initialize(location: impl AsRef<Path>) -> FilesResult<Self> {
        let location = location.as_ref();

        fs::create_dir_all(location).map_err(|source| FilesError::StorageInit {
            path: location.to_path_buf(),
            source,
        })?;

        let path = location
            .canonicalize()
            .map_err(|source| FilesError::StorageInit {
                path: location.to_path_buf(),
                source,
            })?;

        if !path.is_dir() {
            return Err(FilesError::StorageInit {
                path,
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "storage location is not a directory",
                ),
            });
        }

        tracing::info!("storage root initialised at {}", path.display());

        Ok(Self { path })
    }

    /// Returns the absolute, canonical storage directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AsRef<Path> for StorageRoot {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}
