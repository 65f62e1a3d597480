//! Repositories over the blob store.
//!
//! Each repository is a zero-sized struct with async static methods taking
//! `&dyn BlobStore`, one per storage-level operation.

pub mod feedback_repo;
pub mod submission_repo;
pub mod template_repo;

pub use feedback_repo::FeedbackRepo;
pub use submission_repo::SubmissionRepo;
pub use template_repo::TemplateRepo;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::blob::BlobStore;
use crate::error::StoreError;

/// Read and parse a JSON document. `Ok(None)` when the key is absent.
pub(crate) async fn read_json<T: DeserializeOwned>(
    store: &dyn BlobStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(bytes) = store.get(key).await? else {
        return Ok(None);
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StoreError::Serialization {
            key: key.to_string(),
            source,
        })
}

/// Like [`read_json`], but a document that fails to parse is logged and
/// reported as absent.
pub(crate) async fn read_json_lenient<T: DeserializeOwned>(
    store: &dyn BlobStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match read_json(store, key).await {
        Err(StoreError::Serialization { key, source }) => {
            tracing::warn!(key = %key, error = %source, "Ignoring malformed record");
            Ok(None)
        }
        other => other,
    }
}

/// Serialize `value` and store it under `key` in a single put.
pub(crate) async fn write_json<T: Serialize>(
    store: &dyn BlobStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let body = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Serialization {
        key: key.to_string(),
        source,
    })?;
    store.put(key, body).await?;
    Ok(())
}
