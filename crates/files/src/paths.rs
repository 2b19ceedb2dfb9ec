//! Stored-name derivation and path confinement.
//!
//! Every destination is computed by joining a candidate filename onto the storage root and
//! collapsing `.` and `..` segments lexically. The result is accepted only when its parent is
//! exactly the storage root, which rules out separators, parent segments and absolute
//! candidates that would otherwise escape the root.

use crate::constants::EXTENSION_SEPARATOR;
use std::path::{Component, Path, PathBuf};

/// Extracts the extension from an uploaded file's original name.
///
/// Only the final path component is considered (both `/` and `\` count as separators, since
/// browsers on Windows may send a full client path). The extension is whatever follows the
/// last `.` in that component.
///
/// Returns `None` when there is no `.` or nothing follows it.
///
/// ```
/// use plates_files::filename_extension;
///
/// assert_eq!(filename_extension("dog.jpg"), Some("jpg"));
/// assert_eq!(filename_extension("archive.tar.gz"), Some("gz"));
/// assert_eq!(filename_extension("README"), None);
/// ```
pub fn filename_extension(original_filename: &str) -> Option<&str> {
    let basename = original_filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_filename);

    let (_, extension) = basename.rsplit_once(EXTENSION_SEPARATOR)?;
    if extension.is_empty() {
        None
    } else {
        Some(extension)
    }
}

/// Composes the stored filename for a logical name.
///
/// Without an extension the logical name is used as is, with no trailing separator.
pub(crate) fn compose_stored_name(logical_name: &str, extension: Option<&str>) -> String {
    match extension {
        Some(extension) => format!("{logical_name}{EXTENSION_SEPARATOR}{extension}"),
        None => logical_name.to_owned(),
    }
}

/// Collapses `.` and `..` components without touching the filesystem.
///
/// A `..` at the filesystem root stays at the root.
pub(crate) fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Resolves `filename` against `root` and returns the destination only if it stays directly
/// inside `root`.
///
/// `root` must already be absolute and canonical.
pub(crate) fn resolve_confined(root: &Path, filename: &str) -> Option<PathBuf> {
    let destination = normalize_lexically(&root.join(filename));

    if destination.parent() == Some(root) && destination.file_name().is_some() {
        Some(destination)
    } else {
        None
    }
}
