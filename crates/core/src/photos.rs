//! Photo upload and retrieval.
//!
//! The photo service sits between an inbound upload surface and the blob store: it allocates a
//! fresh identifier for every upload, stores the bytes under that identifier, and hands back a
//! [`Photo`] whose `url` is the stored filename. Retrieval takes that same value.

use crate::config::CoreConfig;
use crate::CoreResult;
use chrono::{DateTime, Utc};
use plates_files::{BlobStore, ResourceHandle, StorageRoot};
use plates_uuid::PhotoId;

/// A stored photo, as returned to clients after an upload.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// Stored filename, used to fetch the photo back.
    pub url: String,
    /// When the upload was stored (UTC).
    pub upload_date: DateTime<Utc>,
}

/// Photo operations over a single blob store.
#[derive(Debug, Clone)]
pub struct PhotoService {
    store: BlobStore,
}

impl PhotoService {
    /// Creates a service over an already initialised blob store.
    pub fn new(store: BlobStore) -> Self {
        Self { store }
    }

    /// Initialises the configured storage root and builds a service over it.
    ///
    /// This is the single initialisation point: call it once at startup, before accepting any
    /// upload or fetch.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::Files`] wrapping
    /// [`plates_files::FilesError::StorageInit`] if the root cannot be created. Hosts should
    /// treat this as fatal.
    pub fn initialise(config: &CoreConfig) -> CoreResult<Self> {
        let root = StorageRoot::initialize(config.storage_location())?;
        Ok(Self::new(BlobStore::new(root)))
    }

    pub fn blob_store(&self) -> &BlobStore {
        &self.store
    }

    /// Stores an uploaded photo under a newly generated identifier.
    ///
    /// # Arguments
    ///
    /// * `data` - The uploaded bytes
    /// * `original_filename` - The client's filename; only its extension is kept
    ///
    /// # Errors
    ///
    /// Propagates blob store failures (empty upload, write failure).
    pub fn upload_photo(&self, data: &[u8], original_filename: &str) -> CoreResult<Photo> {
        let id = PhotoId::new();
        let url = self.store.store(data, &id.to_string(), original_filename)?;

        tracing::info!("uploaded photo {} ({} bytes)", url, data.len());

        Ok(Photo {
            url,
            upload_date: Utc::now(),
        })
    }

    /// Looks up a photo by the `url` returned from [`PhotoService::upload_photo`].
    ///
    /// The part before the first `.` must be a canonical [`PhotoId`]; anything else was not
    /// issued by this service and is treated as absent. Returns `None` when no readable photo
    /// exists under that name.
    pub fn get_photo_as_resource(&self, id: &str) -> Option<ResourceHandle> {
        let stem = id.split_once('.').map_or(id, |(stem, _)| stem);
        if let Err(e) = PhotoId::parse(stem) {
            tracing::warn!("could not read photo {:?}: {}", id, e);
            return None;
        }

        self.store.load(id)
    }
}
