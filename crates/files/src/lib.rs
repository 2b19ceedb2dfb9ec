//! RealPlates File Storage
//!
//! This crate provides the confined blob storage behind RealPlates photo uploads.
//!
//! ## Design Principles
//!
//! - One storage root per process, created once at startup and passed in explicitly
//! - Blobs live in a flat directory as `<logical_name>.<extension>`
//! - A destination whose normalised parent is not the storage root is never written
//! - Storing under an existing name replaces the previous content
//! - Reading back never fails: a missing or unreadable blob is simply absent
//!
//! ## Storage Layout
//!
//! ```text
//! <storage_root>/
//! ├── 550e8400e29b41d4a716446655440000.jpg
//! ├── 7c9e6679742540de944be07fc1f90ae7.png
//! └── …
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use plates_files::{BlobStore, StorageRoot};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let root = StorageRoot::initialize("uploads")?;
//! let store = BlobStore::new(root);
//!
//! let stored_name = store.store(b"JPEGDATA", "photo123", "dog.jpg")?;
//! assert_eq!(stored_name, "photo123.jpg");
//!
//! if let Some(handle) = store.load(&stored_name) {
//!     let bytes = handle.read_bytes()?;
//!     assert_eq!(bytes, b"JPEGDATA");
//! }
//! # Ok(())
//! # }
//! ```

mod constants;
mod files;
mod paths;
mod resource;
mod root;

pub use constants::DEFAULT_STORAGE_LOCATION;
pub use files::BlobStore;
pub use paths::filename_extension;
pub use resource::ResourceHandle;
pub use root::StorageRoot;

use std::path::PathBuf;

/// Errors that can occur during file operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// The storage root directory could not be created or resolved
    #[error("could not initialise storage location {path}: {source}", path = path.display())]
    StorageInit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The upload contained no bytes
    #[error("could not save an empty file")]
    EmptyFile,

    /// The computed destination would land outside the storage root
    #[error("cannot store file outside storage directory: {0}")]
    PathTraversal(String),

    /// Writing the blob to disk failed
    #[error("failed to store file {filename}: {source}")]
    StorageWrite {
        filename: String,
        #[source]
        source: std::io::Error,
    },
}

impl FilesError {
    /// Returns true when the error was caused by the caller's input rather than the server.
    ///
    /// `EmptyFile` and `PathTraversal` reject a request; `StorageInit` and `StorageWrite`
    /// are server-side failures.
    pub fn is_client_error(&self) -> bool {
        matches!(self, FilesError::EmptyFile | FilesError::PathTraversal(_))
    }
}

pub type FilesResult<T> = std::result::Result<T, FilesError>;
