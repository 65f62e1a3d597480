//! Handlers for stored submissions and their exports.

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use catapult_core::error::CoreError;
use catapult_core::export::{archive_name, export_files};
use catapult_core::submission::{NewSubmission, Submission};
use catapult_store::repositories::SubmissionRepo;

use crate::archive::build_zip;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

async fn find_or_404(state: &AppState, id: &str) -> AppResult<Submission> {
    SubmissionRepo::find_by_id(state.store(), id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Submission", id)))
}

// ---------------------------------------------------------------------------
// GET /submissions
// ---------------------------------------------------------------------------

/// List all submissions, newest first. Legacy combined records are served
/// per template.
pub async fn list_submissions(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let submissions: Vec<Submission> = SubmissionRepo::list_all(state.store())
        .await?
        .into_iter()
        .map(Submission::normalized)
        .collect();
    Ok(Json(DataResponse { data: submissions }))
}

// ---------------------------------------------------------------------------
// POST /submissions
// ---------------------------------------------------------------------------

/// Store a finished generation run. Returns the record with its assigned id.
pub async fn create_submission(
    State(state): State<AppState>,
    Json(input): Json<NewSubmission>,
) -> AppResult<impl IntoResponse> {
    let submission = SubmissionRepo::create(state.store(), input).await?;
    Ok(DataResponse::created(submission))
}

// ---------------------------------------------------------------------------
// GET /submissions/{id}
// ---------------------------------------------------------------------------

pub async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let submission = find_or_404(&state, &id).await?.normalized();
    Ok(Json(DataResponse { data: submission }))
}

// ---------------------------------------------------------------------------
// DELETE /submissions/{id}
// ---------------------------------------------------------------------------

/// Delete a submission. Missing ids also answer 204.
pub async fn delete_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    SubmissionRepo::delete_by_id(state.store(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// GET /submissions/{id}/files
// ---------------------------------------------------------------------------

/// Per-template markdown files for preview and individual download.
pub async fn list_files(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let submission = find_or_404(&state, &id).await?;
    Ok(Json(DataResponse {
        data: export_files(&submission),
    }))
}

// ---------------------------------------------------------------------------
// GET /submissions/{id}/archive
// ---------------------------------------------------------------------------

/// All export files of one submission as a zip download.
pub async fn download_archive(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let submission = find_or_404(&state, &id).await?;
    let files = export_files(&submission);
    let bytes = build_zip(&files)
        .map_err(|e| CoreError::Internal(format!("Failed to build archive: {e}")))?;

    tracing::info!(
        submission_id = %id,
        files = files.len(),
        size = bytes.len(),
        "Submission archive built",
    );

    let disposition = format!(
        "attachment; filename=\"{}\"",
        archive_name(&submission.feature.name)
    );
    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "application/zip".to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
