//! Persistence for Content Catapult.
//!
//! A [`BlobStore`] holds JSON documents under string keys; the repositories
//! in [`repositories`] give those documents their meaning. Three backends
//! are available: in-memory, local filesystem and S3.

use std::path::PathBuf;
use std::sync::Arc;

pub mod blob;
pub mod error;
pub mod fs;
pub mod memory;
pub mod repositories;
pub mod s3;

pub use blob::{BlobError, BlobStore};
pub use error::StoreError;

/// Shared handle to the configured backend.
pub type SharedStore = Arc<dyn BlobStore>;

/// Which backend to open, with its settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Local { root: PathBuf },
    S3 { bucket: String, endpoint: Option<String> },
}

/// Open the configured backend.
pub async fn connect(backend: &StorageBackend) -> Result<SharedStore, BlobError> {
    let store: SharedStore = match backend {
        StorageBackend::Memory => Arc::new(memory::MemoryBlobStore::new()),
        StorageBackend::Local { root } => Arc::new(fs::LocalBlobStore::open(root.clone()).await?),
        StorageBackend::S3 { bucket, endpoint } => {
            Arc::new(s3::S3BlobStore::from_env(bucket.clone(), endpoint.as_deref()).await)
        }
    };
    tracing::info!(backend = store.backend_name(), "Blob store ready");
    Ok(store)
}
