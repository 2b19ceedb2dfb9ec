//! Read-only handles to stored blobs.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// A read-only reference to a stored blob on disk.
///
/// Returned by [`crate::BlobStore::load`] once the blob has been found and opened
/// successfully. The handle does not keep the file open: it is only guaranteed valid at the
/// moment it was produced, and callers must cope with the file disappearing afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceHandle {
    filename: String,
    path: PathBuf,
    size_bytes: u64,
    media_type: Option<&'static str>,
}

impl ResourceHandle {
    pub(crate) fn new(filename: &str, path: PathBuf, size_bytes: u64) -> Self {
        // Best-effort only; a sniffing failure just leaves the type unknown.
        let media_type = infer::get_from_path(&path)
            .ok()
            .flatten()
            .map(|kind| kind.mime_type());

        Self {
            filename: filename.to_owned(),
            path,
            size_bytes,
            media_type,
        }
    }

    /// The stored filename this handle was loaded by.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Absolute path of the blob inside the storage root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the blob when it was loaded.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Media type detected from the blob's leading bytes, if recognised.
    ///
    /// This is advisory and should not be considered authoritative.
    pub fn media_type(&self) -> Option<&'static str> {
        self.media_type
    }

    /// Opens the blob for reading.
    pub fn open(&self) -> std::io::Result<fs::File> {
        fs::File::open(&self.path)
    }

    /// Reads the whole blob into memory.
    pub fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.open()?.read_to_end(&mut buffer)?;
        Ok(buffer)
    }
}
