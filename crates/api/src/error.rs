use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use catapult_core::error::CoreError;
use catapult_llm::GenerationError;
use catapult_store::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain, storage and generation errors and implements
/// [`IntoResponse`] to produce consistent JSON error responses. Storage keys,
/// upstream bodies and other internals are logged, never returned.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `catapult_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A blob store or repository error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A text generation error.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

fn classify_core(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core(core),

            // --- Storage ---
            AppError::Store(StoreError::Core(core)) => classify_core(core),
            AppError::Store(err) => {
                tracing::error!(error = %err, "Storage error");
                internal()
            }

            // --- Generation ---
            AppError::Generation(GenerationError::Invalid(core)) => classify_core(core),
            AppError::Generation(GenerationError::AllFailed { attempted }) => {
                tracing::error!(attempted, "Content generation failed for every template");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "Content generation failed for all templates. Please try again.".to_string(),
                )
            }
            AppError::Generation(err) => {
                tracing::error!(error = %err, "Text generation error");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "The text generation service failed. Please try again.".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
