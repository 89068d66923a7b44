pub mod file;
pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                   list, create
/// /projects/generate                          create + generate all (POST)
/// /projects/{id}                              get with latest outputs
/// /projects/{id}/outputs                      output history
/// /projects/{id}/actions/{action_key}         run one action (POST)
/// /projects/{id}/generate                     generate all (POST)
///
/// /files                                      list, upload for completion
/// /files/{id}/download                        download a finished document
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/files", file::router())
}
