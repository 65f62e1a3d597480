//! Route definitions for stored submissions.
//!
//! Mounted at `/submissions` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::submissions;
use crate::state::AppState;

/// Submission routes.
///
/// ```text
/// GET    /                  -> list_submissions
/// POST   /                  -> create_submission
/// GET    /{id}              -> get_submission
/// DELETE /{id}              -> delete_submission
/// GET    /{id}/files        -> list_files
/// GET    /{id}/archive      -> download_archive
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(submissions::list_submissions).post(submissions::create_submission),
        )
        .route(
            "/{id}",
            get(submissions::get_submission).delete(submissions::delete_submission),
        )
        .route("/{id}/files", get(submissions::list_files))
        .route("/{id}/archive", get(submissions::download_archive))
}
