use axum::routing::post;
use axum::Router;

use crate::handlers::feedback;
use crate::state::AppState;

/// `POST /feedback` -> submit_feedback
pub fn router() -> Router<AppState> {
    Router::new().route("/feedback", post(feedback::submit_feedback))
}
