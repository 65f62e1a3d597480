use catapult_core::error::CoreError;

/// Errors from text generation.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The request was rejected before any external call.
    #[error(transparent)]
    Invalid(#[from] CoreError),

    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The model API returned a non-2xx status code.
    #[error("Model API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Every per-template call failed.
    #[error("Content generation failed for all {attempted} templates")]
    AllFailed { attempted: usize },
}
