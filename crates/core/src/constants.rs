//! Constants used throughout the RealPlates core crate.

/// Environment variable naming the storage location, read by the host at startup.
pub const STORAGE_LOCATION_ENV: &str = "PLATES_STORAGE_LOCATION";

/// Default storage location when none is configured.
pub const DEFAULT_STORAGE_LOCATION: &str = plates_files::DEFAULT_STORAGE_LOCATION;
