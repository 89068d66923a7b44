//! Handlers that call the completion service.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use schemasmith_core::action::ActionKey;
use schemasmith_core::types::DbId;
use schemasmith_db::models::project::{CreateProject, Project};
use schemasmith_pipeline::{execute_action, generate_for_project, GeneratedDocument};
use serde::Serialize;

use crate::error::AppResult;
use crate::handlers::file::download_url;
use crate::handlers::project::{find_project, register_project, OutputView};
use crate::handlers::run_detached;
use crate::response::DataResponse;
use crate::state::AppState;

/// Outcome of a full generation run.
#[derive(Debug, Serialize)]
pub struct GenerationResponse {
    pub project: Project,
    pub file_id: DbId,
    pub download_url: String,
    /// Number of actions whose output was stored.
    pub stored_outputs: usize,
    /// `"action_key: message"` for each action that failed.
    pub failures: Vec<String>,
}

impl GenerationResponse {
    fn new(project: Project, generated: GeneratedDocument) -> Self {
        Self {
            project,
            file_id: generated.file.id,
            download_url: download_url(generated.file.id),
            stored_outputs: generated.outputs.len(),
            failures: generated.failures,
        }
    }
}

async fn generate(state: &AppState, project: Project) -> AppResult<GenerationResponse> {
    let pool = state.pool.clone();
    let client = Arc::clone(&state.completion);
    let settings = Arc::clone(&state.pipeline);
    let target = project.clone();
    let generated = run_detached(async move {
        generate_for_project(&pool, client.as_ref(), &target, &settings).await
    })
    .await?;
    if !generated.failures.is_empty() {
        tracing::warn!(
            project_id = project.id,
            failures = ?generated.failures,
            "Generation finished with failed actions",
        );
    }
    Ok(GenerationResponse::new(project, generated))
}

/// POST /api/v1/projects/{id}/actions/{action_key}
///
/// The action key is validated before the project is looked up.
pub async fn run_action(
    State(state): State<AppState>,
    Path((id, action_key)): Path<(DbId, String)>,
) -> AppResult<Json<DataResponse<OutputView>>> {
    let action: ActionKey = action_key.parse()?;
    let project = find_project(&state.pool, id).await?;

    let pool = state.pool.clone();
    let client = Arc::clone(&state.completion);
    let settings = Arc::clone(&state.pipeline);
    let executed = run_detached(async move {
        execute_action(&pool, client.as_ref(), &project, action, &settings).await
    })
    .await?;
    Ok(Json(DataResponse {
        data: OutputView::new(executed.output, executed.diagram_url),
    }))
}

/// POST /api/v1/projects/{id}/generate
pub async fn generate_all(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<GenerationResponse>>> {
    let project = find_project(&state.pool, id).await?;
    let response = generate(&state, project).await?;
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/projects/generate
///
/// Create the project, then run every action for it.
pub async fn create_and_generate(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<GenerationResponse>>)> {
    let project = register_project(&state.pool, input).await?;
    let response = generate(&state, project).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}
