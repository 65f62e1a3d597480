//! Blob store abstraction.
//!
//! Every piece of persisted state (templates, snapshots, submissions,
//! feedback) is a JSON document under a `/`-separated key. Backends only
//! need get/put/delete/list; all structure lives in the repositories.

use async_trait::async_trait;

/// Errors raised by a blob store backend.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// A flat key/value object store.
///
/// Writes are single atomic puts of the whole object, last writer wins.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Short backend name for logs and the health endpoint.
    fn backend_name(&self) -> &'static str;

    /// Read an object. `Ok(None)` when the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError>;

    /// Create or replace an object.
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), BlobError>;

    /// Remove an object. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<(), BlobError>;

    /// All keys starting with `prefix`, sorted lexicographically.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, BlobError>;

    /// Cheap reachability probe used by the health check.
    async fn ping(&self) -> Result<(), BlobError> {
        Ok(())
    }
}

/// Reject keys that could escape a key namespace.
///
/// A key is a non-empty sequence of `/`-separated segments, none of which is
/// empty, `.` or `..`. Backslashes and NUL bytes are not allowed.
pub fn validate_key(key: &str) -> Result<(), BlobError> {
    let invalid = key.is_empty()
        || key.contains(['\\', '\0'])
        || key
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if invalid {
        Err(BlobError::InvalidKey(key.to_string()))
    } else {
        Ok(())
    }
}
