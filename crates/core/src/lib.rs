//! # RealPlates Core
//!
//! Core business logic for RealPlates photo uploads:
//! - Startup configuration for the storage location
//! - Photo upload and retrieval over the confined blob store
//!
//! **No API concerns**: HTTP routing, authentication and search indexing live outside this
//! crate; they call [`PhotoService`] with raw upload bytes and map its results to responses.

pub mod config;
pub mod constants;
mod error;
pub mod photos;

pub use config::CoreConfig;
pub use error::{CoreError, CoreResult};
pub use photos::{Photo, PhotoService};
pub use plates_files::{FilesError, ResourceHandle};
