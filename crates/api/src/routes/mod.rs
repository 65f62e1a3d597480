pub mod feedback;
pub mod generation;
pub mod health;
pub mod submissions;
pub mod templates;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /templates                       list, create
/// /templates/snapshot              rebuild list snapshot (POST)
/// /templates/draft-prompt          draft a template prompt (POST)
/// /templates/{id}                  get, save override, delete custom
/// /templates/{id}/override         revert to default (DELETE)
///
/// /generate                        generate content (POST)
///
/// /submissions                     list, create
/// /submissions/{id}                get, delete
/// /submissions/{id}/files          per-template markdown files
/// /submissions/{id}/archive        zip download
///
/// /feedback                        record feedback (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/templates", templates::router())
        .nest("/submissions", submissions::router())
        .merge(generation::router())
        .merge(feedback::router())
}
