//! Route definitions for templates.
//!
//! Mounted at `/templates` by `api_routes()`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

/// Template routes.
///
/// ```text
/// GET    /                  -> list_templates
/// POST   /                  -> create_template
/// POST   /snapshot          -> refresh_snapshot
/// POST   /draft-prompt      -> draft_prompt
/// GET    /{id}              -> get_template
/// PUT    /{id}              -> save_template
/// DELETE /{id}              -> delete_template
/// DELETE /{id}/override     -> revert_template
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(templates::list_templates).post(templates::create_template),
        )
        .route("/snapshot", post(templates::refresh_snapshot))
        .route("/draft-prompt", post(templates::draft_prompt))
        .route(
            "/{id}",
            get(templates::get_template)
                .put(templates::save_template)
                .delete(templates::delete_template),
        )
        .route("/{id}/override", delete(templates::revert_template))
}
