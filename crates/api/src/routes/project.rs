//! Route definitions for the `/projects` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{generation, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                              -> list
/// POST   /                              -> create
/// POST   /generate                      -> create_and_generate
/// GET    /{id}                          -> get_by_id
/// GET    /{id}/outputs                  -> list_outputs
/// POST   /{id}/actions/{action_key}     -> run_action
/// POST   /{id}/generate                 -> generate_all
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/generate", post(generation::create_and_generate))
        .route("/{id}", get(project::get_by_id))
        .route("/{id}/outputs", get(project::list_outputs))
        .route("/{id}/actions/{action_key}", post(generation::run_action))
        .route("/{id}/generate", post(generation::generate_all))
}
