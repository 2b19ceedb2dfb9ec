//! Constants used by the storage crate.

/// Storage location used when none is configured.
pub const DEFAULT_STORAGE_LOCATION: &str = "uploads";

/// Separator placed between a logical name and its extension.
pub(crate) const EXTENSION_SEPARATOR: char = '.';
