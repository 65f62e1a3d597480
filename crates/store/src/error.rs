use catapult_core::error::CoreError;

use crate::blob::BlobError;

/// Errors surfaced by the repositories.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Blob(#[from] BlobError),

    #[error("Malformed record at {key}: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// The domain error, if this wraps one.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            Self::Core(e) => Some(e),
            _ => None,
        }
    }
}
