//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use schemasmith_core::error::CoreError;
use schemasmith_core::types::DbId;
use schemasmith_db::models::project::{CreateProject, Project};
use schemasmith_db::models::project_output::ProjectOutput;
use schemasmith_db::repositories::{ProjectOutputRepo, ProjectRepo};
use schemasmith_db::DbPool;
use schemasmith_pipeline::diagram_url;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum number of projects returned by the list endpoint.
const PROJECT_LIST_LIMIT: i64 = 200;

/// Maximum number of outputs returned by the history endpoint.
const OUTPUT_HISTORY_LIMIT: i64 = 500;

/// A stored output with its rendered-diagram link, when it has one.
#[derive(Debug, Serialize)]
pub struct OutputView {
    #[serde(flatten)]
    pub output: ProjectOutput,
    pub diagram_url: Option<String>,
}

impl OutputView {
    pub fn new(output: ProjectOutput, diagram_url: Option<String>) -> Self {
        Self {
            output,
            diagram_url,
        }
    }

    fn with_diagram(output: ProjectOutput, plantuml_server: &str) -> Self {
        let diagram_url = output
            .action()
            .and_then(|action| diagram_url(action, &output.output_text, plantuml_server));
        Self::new(output, diagram_url)
    }
}

/// A project with the latest output of each action run so far.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    pub project: Project,
    pub latest_outputs: Vec<OutputView>,
}

/// Look up a project or fail with 404.
pub(crate) async fn find_project(pool: &DbPool, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}

/// Validate `input` and insert it, rejecting duplicate titles.
///
/// The title pre-check gives a readable message; the `uq_projects_title`
/// constraint still catches concurrent inserts.
pub(crate) async fn register_project(pool: &DbPool, input: CreateProject) -> AppResult<Project> {
    let input = input.normalize()?;
    if ProjectRepo::find_by_title(pool, &input.title).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "A project titled '{}' already exists",
            input.title
        ))));
    }
    let project = ProjectRepo::create(pool, &input).await?;
    tracing::info!(project_id = project.id, title = %project.title, "Project created");
    Ok(project)
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let project = register_project(&state.pool, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = ProjectRepo::list(&state.pool, PROJECT_LIST_LIMIT).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let project = find_project(&state.pool, id).await?;
    let latest_outputs = ProjectOutputRepo::latest_per_action(&state.pool, id)
        .await?
        .into_iter()
        .map(|o| OutputView::with_diagram(o, &state.pipeline.plantuml_server))
        .collect();
    Ok(Json(DataResponse {
        data: ProjectDetail {
            project,
            latest_outputs,
        },
    }))
}

/// GET /api/v1/projects/{id}/outputs
pub async fn list_outputs(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ProjectOutput>>>> {
    find_project(&state.pool, id).await?;
    let outputs = ProjectOutputRepo::list_by_project(&state.pool, id, OUTPUT_HISTORY_LIMIT).await?;
    Ok(Json(DataResponse { data: outputs }))
}
