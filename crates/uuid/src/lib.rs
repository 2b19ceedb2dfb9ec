//! Photo identifier utilities.
//!
//! Every uploaded photo is stored under a freshly generated identifier. To keep stored names
//! predictable and filesystem-safe, RealPlates uses a *canonical* UUID representation:
//! **32 lowercase hexadecimal characters** (no hyphens).
//!
//! ## Canonical form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! A canonical identifier never contains a path separator or a `.`, so it is always a valid
//! logical name for the blob store.

mod photo_id;

pub use photo_id::PhotoId;

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
