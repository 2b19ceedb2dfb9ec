//! Confined blob storage service implementation
//!
//! This module provides [`BlobStore`], which writes uploaded blobs into the storage root and
//! reads them back.
//!
//! # Naming
//!
//! A blob is stored as `<logical_name>.<extension>`, where the logical name is chosen by the
//! caller and the extension is taken from the upload's original filename. If the original
//! filename has no extension the blob is stored as `<logical_name>` with no trailing dot.
//!
//! # Security Model
//!
//! - The storage root is canonicalised once, when the [`StorageRoot`] is initialised
//! - Every destination is normalised and must sit directly inside the storage root
//! - A rejected destination is reported before any byte is written
//! - Loads apply the same check, so names the caller did not obtain from `store` cannot reach
//!   outside the root either
//!
//! # Concurrency
//!
//! `BlobStore` holds no mutable state and is `Send + Sync`; clone it freely. Stores to the same
//! name race at the filesystem level and the last writer wins. A load running alongside a store
//! to the same name may observe a partially written file.

use crate::paths::{compose_stored_name, filename_extension, resolve_confined};
use crate::{FilesError, FilesResult, ResourceHandle, StorageRoot};
use std::fs;
use std::io::ErrorKind;

/// Service for storing and loading blobs within a single storage root
///
/// # Design
///
/// - Root-scoped: each instance is bound to the [`StorageRoot`] it was built with
/// - Replace-on-conflict: storing under an existing name overwrites it
/// - Soft-fail reads: [`BlobStore::load`] reports absence instead of errors
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: StorageRoot,
}

impl BlobStore {
    /// Creates a new `BlobStore` over an initialised storage root
    pub fn new(root: StorageRoot) -> Self {
        Self { root }
    }

    /// Returns the storage root this store writes into
    #[must_use]
    pub fn root(&self) -> &StorageRoot {
        &self.root
    }

    /// Stores an uploaded blob under a caller-chosen logical name
    ///
    /// # Arguments
    ///
    /// * `data` - The uploaded bytes
    /// * `logical_name` - Base name for the stored blob, without extension
    /// * `original_filename` - The upload's original filename; only its extension is used
    ///
    /// # Returns
    ///
    /// The stored filename (`<logical_name>.<extension>`, or `<logical_name>` when the
    /// original filename has no extension). Pass it to [`BlobStore::load`] to read the blob
    /// back.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - `data` is empty ([`FilesError::EmptyFile`], nothing touches the filesystem)
    /// - The destination would fall outside the storage root ([`FilesError::PathTraversal`])
    /// - Writing the file fails ([`FilesError::StorageWrite`]); the destination may then hold
    ///   partial content
    pub fn store(
        &self,
        data: &[u8],
        logical_name: &str,
        original_filename: &str,
    ) -> FilesResult<String> {
        if data.is_empty() {
            return Err(FilesError::EmptyFile);
        }

        let extension = filename_extension(original_filename);
        let stored_name = compose_stored_name(logical_name, extension);

        let Some(destination) = resolve_confined(self.root.path(), &stored_name) else {
            tracing::warn!(
                "rejected store outside storage root: {:?} (root: {})",
                stored_name,
                self.root.path().display()
            );
            return Err(FilesError::PathTraversal(stored_name));
        };

        // Replace a symlink entry itself rather than writing through it to its target.
        if let Ok(existing) = fs::symlink_metadata(&destination) {
            if existing.file_type().is_symlink() {
                tracing::warn!("replacing symlink at {}", destination.display());
                fs::remove_file(&destination).map_err(|source| FilesError::StorageWrite {
                    filename: stored_name.clone(),
                    source,
                })?;
            }
        }

        fs::write(&destination, data).map_err(|source| FilesError::StorageWrite {
            filename: stored_name.clone(),
            source,
        })?;

        tracing::debug!("stored {} bytes at {}", data.len(), destination.display());

        Ok(stored_name)
    }

    /// Loads a previously stored blob as a read-only resource handle
    ///
    /// # Arguments
    ///
    /// * `stored_name` - A filename returned by [`BlobStore::store`]
    ///
    /// # Returns
    ///
    /// `Some(handle)` if the blob exists, is a regular file (not a symlink) and can be opened
    /// for reading. `None` otherwise, including for names that resolve outside the storage root
    /// or cannot be resolved at all. Those cases are logged, never returned as errors.
    pub fn load(&self, stored_name: &str) -> Option<ResourceHandle> {
        let Some(path) = resolve_confined(self.root.path(), stored_name) else {
            tracing::warn!("could not read file {:?}: resolves outside storage root", stored_name);
            return None;
        };

        // Symlinks are not followed: their target may sit outside the storage root.
        let metadata = match fs::symlink_metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("file not found: {:?}", stored_name);
                return None;
            }
            Err(e) => {
                tracing::warn!("could not read file {:?}: {}", stored_name, e);
                return None;
            }
        };

        if !metadata.is_file() {
            tracing::warn!("could not read file {:?}: not a regular file", stored_name);
            return None;
        }

        // Readability is only known by trying; the handle itself does not keep the file open.
        if let Err(e) = fs::File::open(&path) {
            tracing::warn!("could not read file {:?}: {}", stored_name, e);
            return None;
        }

        Some(ResourceHandle::new(stored_name, path, metadata.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    /// Helper to create a store rooted at `<temp>/uploads`
    fn create_test_store(temp: &TempDir) -> BlobStore {
        let root = StorageRoot::initialize(temp.path().join("uploads")).unwrap();
        BlobStore::new(root)
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_store_and_load_photo() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);

        let stored_name = store.store(b"JPEGDATA", "photo123", "dog.jpg").unwrap();
        assert_eq!(stored_name, "photo123.jpg");

        let handle = store.load(&stored_name).expect("stored photo should load");
        assert_eq!(handle.filename(), "photo123.jpg");
        assert_eq!(handle.size_bytes(), 8);
        assert_eq!(handle.read_bytes().unwrap(), b"JPEGDATA");
        assert_eq!(handle.path(), store.root().path().join("photo123.jpg"));
    }

    #[test]
    fn test_store_writes_directly_into_root() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);

        store.store(b"one", "a", "x.png").unwrap();
        store.store(b"two", "b", "y.gif").unwrap();

        assert_eq!(entries(store.root().path()), vec!["a.png", "b.gif"]);
    }

    #[test]
    fn test_store_empty_file_rejected() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);

        let result = store.store(b"", "x", "a.png");

        assert!(matches!(result, Err(FilesError::EmptyFile)));
        assert!(entries(store.root().path()).is_empty());
    }

    #[test]
    fn test_store_empty_file_checked_before_traversal() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);

        let result = store.store(b"", "../../etc/passwd", "a.txt");

        assert!(matches!(result, Err(FilesError::EmptyFile)));
    }

    #[test]
    fn test_store_parent_traversal_rejected() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);

        let result = store.store(b"data", "../../etc/passwd", "a.txt");

        match result {
            Err(FilesError::PathTraversal(name)) => assert_eq!(name, "../../etc/passwd.txt"),
            other => panic!("expected PathTraversal, got {other:?}"),
        }
    }

    #[test]
    fn test_store_sibling_escape_creates_nothing() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);

        let result = store.store(b"data", "../escape", "a.txt");

        assert!(matches!(result, Err(FilesError::PathTraversal(_))));
        assert!(!temp.path().join("escape.txt").exists());
        assert_eq!(entries(temp.path()), vec!["uploads"]);
        assert!(entries(store.root().path()).is_empty());
    }

    #[test]
    fn test_store_absolute_name_rejected() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);
        let outside = temp.path().join("outside");

        let result = store.store(b"data", outside.to_str().unwrap(), "a.txt");

        assert!(matches!(result, Err(FilesError::PathTraversal(_))));
        assert!(!temp.path().join("outside.txt").exists());
    }

    #[test]
    fn test_store_subdirectory_rejected() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);
        fs::create_dir(store.root().path().join("nested")).unwrap();

        let result = store.store(b"data", "nested/photo", "a.jpg");

        assert!(matches!(result, Err(FilesError::PathTraversal(_))));
        assert!(!store.root().path().join("nested/photo.jpg").exists());
    }

    #[test]
    fn test_store_name_collapsing_to_root_rejected() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);

        let result = store.store(b"data", "x/..", "README");

        assert!(matches!(result, Err(FilesError::PathTraversal(_))));
    }

    #[test]
    fn test_store_overwrites_existing() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);

        store.store(b"first version", "photo", "a.jpg").unwrap();
        let stored_name = store.store(b"second", "photo", "b.jpg").unwrap();

        let handle = store.load(&stored_name).unwrap();
        assert_eq!(handle.read_bytes().unwrap(), b"second");
        assert_eq!(entries(store.root().path()), vec!["photo.jpg"]);
    }

    #[test]
    fn test_store_without_extension() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);

        assert_eq!(store.store(b"data", "photo", "README").unwrap(), "photo");
        assert_eq!(store.store(b"data", "other", "trailing.").unwrap(), "other");
        assert_eq!(store.store(b"data", "third", "").unwrap(), "third");
        assert_eq!(entries(store.root().path()), vec!["other", "photo", "third"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_store_replaces_symlink_instead_of_following_it() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);
        let outside = temp.path().join("outside.txt");
        fs::write(&outside, b"original").unwrap();
        let link = store.root().path().join("photo.jpg");
        std::os::unix::fs::symlink(&outside, &link).unwrap();

        let stored_name = store.store(b"replaced", "photo", "a.jpg").unwrap();

        assert_eq!(stored_name, "photo.jpg");
        assert_eq!(fs::read(&outside).unwrap(), b"original");
        assert!(!fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read(&link).unwrap(), b"replaced");
    }

    #[test]
    fn test_store_uses_basename_extension() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);

        let stored_name = store
            .store(b"data", "photo", "C:\\Users\\me\\holiday.png")
            .unwrap();

        assert_eq!(stored_name, "photo.png");
    }

    #[test]
    fn test_store_harmless_segments_stay_in_root() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);

        let stored_name = store.store(b"data", "a/../b", "x.jpg").unwrap();

        assert_eq!(stored_name, "a/../b.jpg");
        assert!(store.root().path().join("b.jpg").is_file());
        assert_eq!(store.load(&stored_name).unwrap().read_bytes().unwrap(), b"data");
    }

    #[test]
    fn test_store_write_failure() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);
        fs::create_dir(store.root().path().join("photo.jpg")).unwrap();

        let result = store.store(b"data", "photo", "a.jpg");

        match result {
            Err(FilesError::StorageWrite { filename, .. }) => assert_eq!(filename, "photo.jpg"),
            other => panic!("expected StorageWrite, got {other:?}"),
        }
    }

    #[test]
    fn test_store_binary_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);
        let binary_data: Vec<u8> = (0..=255).collect();

        let stored_name = store.store(&binary_data, "binary", "blob.dat").unwrap();
        let handle = store.load(&stored_name).unwrap();

        assert_eq!(handle.size_bytes(), 256);
        assert_eq!(handle.read_bytes().unwrap(), binary_data);
    }

    #[test]
    fn test_load_never_stored() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);

        assert!(store.load("missing.jpg").is_none());
    }

    #[test]
    fn test_load_outside_root() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);
        fs::write(temp.path().join("secret.txt"), b"secret").unwrap();

        assert!(store.load("../secret.txt").is_none());
        let absolute = temp.path().join("secret.txt");
        assert!(store.load(absolute.to_str().unwrap()).is_none());
    }

    #[test]
    fn test_load_directory_is_absent() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);
        fs::create_dir(store.root().path().join("folder")).unwrap();

        assert!(store.load("folder").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_load_does_not_follow_symlink() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);
        let outside = temp.path().join("secret.txt");
        fs::write(&outside, b"secret").unwrap();
        std::os::unix::fs::symlink(&outside, store.root().path().join("secret.jpg")).unwrap();

        assert!(store.load("secret.jpg").is_none());
    }

    #[test]
    fn test_load_unresolvable_name() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);

        assert!(store.load("bad\0name.jpg").is_none());
        assert!(store.load("").is_none());
    }

    #[test]
    fn test_load_detects_media_type() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];

        let stored_name = store.store(&jpeg, "photo", "camera.jpg").unwrap();
        let handle = store.load(&stored_name).unwrap();

        assert_eq!(handle.media_type(), Some("image/jpeg"));
    }

    #[test]
    fn test_concurrent_stores() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(create_test_store(&temp));

        let workers: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let content = format!("photo {i}");
                    store
                        .store(content.as_bytes(), &format!("photo{i}"), "upload.jpg")
                        .unwrap()
                })
            })
            .collect();

        for (i, worker) in workers.into_iter().enumerate() {
            let stored_name = worker.join().unwrap();
            let handle = store.load(&stored_name).unwrap();
            assert_eq!(handle.read_bytes().unwrap(), format!("photo {i}").as_bytes());
        }
    }
}
