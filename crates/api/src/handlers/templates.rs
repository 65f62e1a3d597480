//! Handlers for templates: listing, overrides, custom templates and prompt
//! drafting.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use catapult_core::prompt::TemplateDraftRequest;
use catapult_core::template::TemplateInput;
use catapult_llm::drafting::draft_template_prompt;
use catapult_store::repositories::TemplateRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SnapshotRefreshed {
    pub templates: usize,
}

#[derive(Debug, Serialize)]
pub struct DraftedPrompt {
    pub prompt: String,
}

// ---------------------------------------------------------------------------
// GET /templates
// ---------------------------------------------------------------------------

/// List every effective template: defaults (or their overrides) first,
/// custom templates after.
pub async fn list_templates(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let templates = TemplateRepo::resolve_all(state.store()).await?;
    Ok(Json(DataResponse { data: templates }))
}

// ---------------------------------------------------------------------------
// POST /templates
// ---------------------------------------------------------------------------

/// Create a custom template. The id is derived from the name.
pub async fn create_template(
    State(state): State<AppState>,
    Json(input): Json<TemplateInput>,
) -> AppResult<impl IntoResponse> {
    let saved = TemplateRepo::create(state.store(), input).await?;
    Ok(DataResponse::created(saved))
}

// ---------------------------------------------------------------------------
// GET /templates/{id}
// ---------------------------------------------------------------------------

pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let template = TemplateRepo::resolve(state.store(), &id).await?;
    Ok(Json(DataResponse { data: template }))
}

// ---------------------------------------------------------------------------
// PUT /templates/{id}
// ---------------------------------------------------------------------------

/// Save an override (or update a custom template).
///
/// The response carries the snapshot status; a failed snapshot rebuild
/// does not fail the request.
pub async fn save_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<TemplateInput>,
) -> AppResult<impl IntoResponse> {
    let saved = TemplateRepo::save(state.store(), &id, input).await?;
    Ok(Json(DataResponse { data: saved }))
}

// ---------------------------------------------------------------------------
// DELETE /templates/{id}
// ---------------------------------------------------------------------------

/// Delete a custom template. Default templates answer 409.
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    TemplateRepo::delete(state.store(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// DELETE /templates/{id}/override
// ---------------------------------------------------------------------------

pub async fn revert_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let outcome = TemplateRepo::revert(state.store(), &id).await?;
    Ok(Json(DataResponse { data: outcome }))
}

// ---------------------------------------------------------------------------
// POST /templates/snapshot
// ---------------------------------------------------------------------------

pub async fn refresh_snapshot(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let templates = TemplateRepo::refresh_snapshot(state.store()).await?;
    tracing::info!(templates, "Template snapshot rebuilt on request");
    Ok(Json(DataResponse {
        data: SnapshotRefreshed { templates },
    }))
}

// ---------------------------------------------------------------------------
// POST /templates/draft-prompt
// ---------------------------------------------------------------------------

/// Ask the model to draft a reusable prompt for a new template.
pub async fn draft_prompt(
    State(state): State<AppState>,
    Json(input): Json<TemplateDraftRequest>,
) -> AppResult<impl IntoResponse> {
    let prompt = draft_template_prompt(state.generator.as_ref(), &input).await?;
    Ok(Json(DataResponse {
        data: DraftedPrompt { prompt },
    }))
}
