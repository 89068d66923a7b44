//! Route definitions for the `/files` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::file;
use crate::state::AppState;

/// Routes mounted at `/files`.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> upload
/// GET    /{id}/download     -> download
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(file::list).post(file::upload))
        .route("/{id}/download", get(file::download))
}
