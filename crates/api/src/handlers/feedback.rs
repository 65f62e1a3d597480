use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use catapult_store::repositories::feedback_repo::CreateFeedback;
use catapult_store::repositories::FeedbackRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /feedback -- record a vote on generated content.
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(input): Json<CreateFeedback>,
) -> AppResult<impl IntoResponse> {
    let feedback = FeedbackRepo::create(state.store(), input).await?;
    Ok(DataResponse::created(feedback))
}
