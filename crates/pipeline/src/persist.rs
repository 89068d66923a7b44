//! Run actions for a stored project and record the results.

use std::path::Path;

use async_trait::async_trait;
use schemasmith_core::action::ActionKey;
use schemasmith_core::document::Document;
use schemasmith_core::docx::DOCX_MIME_TYPE;
use schemasmith_core::error::CoreError;
use schemasmith_core::types::DbId;
use schemasmith_core::upload::secure_file_name;
use schemasmith_db::models::file_record::{CreateFileRecord, FileRecord};
use schemasmith_db::models::project::Project;
use schemasmith_db::models::project_output::{CreateProjectOutput, ProjectOutput};
use schemasmith_db::models::status::FileStatus;
use schemasmith_db::repositories::{FileRecordRepo, ProjectOutputRepo};
use schemasmith_llm::CompletionClient;
use sqlx::PgPool;

use crate::action::{run_action, ActionOutput};
use crate::batch::{generate_all, BatchReport, OutcomeSink};
use crate::error::PipelineError;
use crate::settings::PipelineSettings;

/// A stored output plus its diagram link, if it has one.
#[derive(Debug, Clone)]
pub struct ExecutedAction {
    pub output: ProjectOutput,
    pub diagram_url: Option<String>,
}

/// The downloadable result of a full batch.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    /// File record in the `DONE` state.
    pub file: FileRecord,
    /// Stored outputs of the successful actions.
    pub outputs: Vec<ProjectOutput>,
    /// `"action_key: message"` for every failed action.
    pub failures: Vec<String>,
}

fn new_output(project_id: DbId, output: &ActionOutput) -> CreateProjectOutput {
    CreateProjectOutput {
        project_id,
        action: output.action,
        prompt_text: output.prompt.clone(),
        output_text: output.text.clone(),
        model: output.model.clone(),
        temperature: output.temperature,
    }
}

/// Inserts each successful output of a batch as soon as it arrives.
struct OutputStore<'a> {
    pool: &'a PgPool,
    project_id: DbId,
    stored: Vec<ProjectOutput>,
}

#[async_trait]
impl<'a> OutcomeSink for OutputStore<'a> {
    async fn accept(&mut self, output: &ActionOutput) -> Result<(), PipelineError> {
        let stored =
            ProjectOutputRepo::create(self.pool, &new_output(self.project_id, output)).await?;
        tracing::debug!(
            project_id = self.project_id,
            output_id = stored.id,
            action = %output.action,
            "Action output stored",
        );
        self.stored.push(stored);
        Ok(())
    }
}

/// Run one action for `project` and append the result to its history.
pub async fn execute_action(
    pool: &PgPool,
    client: &dyn CompletionClient,
    project: &Project,
    action: ActionKey,
    settings: &PipelineSettings,
) -> Result<ExecutedAction, PipelineError> {
    let result = run_action(client, &project.context(), action, settings.temperature).await?;
    let diagram_url = result.diagram_url(&settings.plantuml_server);
    let output = ProjectOutputRepo::create(pool, &new_output(project.id, &result)).await?;

    tracing::info!(
        project_id = project.id,
        output_id = output.id,
        action = %action,
        "Action output stored",
    );
    Ok(ExecutedAction {
        output,
        diagram_url,
    })
}

/// Run all actions for `project`, store the successful outputs and write
/// the assembled `.docx`.
///
/// Each successful output is stored before the next action runs. Action
/// failures, including a failed output insert, end up in the document and
/// in [`GeneratedDocument::failures`]; only document storage errors fail
/// the call, and those also move the file record to `ERROR`.
pub async fn generate_for_project(
    pool: &PgPool,
    client: &dyn CompletionClient,
    project: &Project,
    settings: &PipelineSettings,
) -> Result<GeneratedDocument, PipelineError> {
    let file = FileRecordRepo::create(
        pool,
        &CreateFileRecord {
            original_name: format!("{}.docx", secure_file_name(&project.title)),
            mime_type: DOCX_MIME_TYPE.to_string(),
            input_path: String::new(),
        },
    )
    .await?;

    match build_and_store(pool, client, project, file.id, settings).await {
        Ok(generated) => Ok(generated),
        Err(e) => {
            mark_failed(pool, file.id, &e).await;
            Err(e)
        }
    }
}

async fn build_and_store(
    pool: &PgPool,
    client: &dyn CompletionClient,
    project: &Project,
    file_id: DbId,
    settings: &PipelineSettings,
) -> Result<GeneratedDocument, PipelineError> {
    let ctx = project.context();
    let mut store = OutputStore {
        pool,
        project_id: project.id,
        stored: Vec::with_capacity(ActionKey::ALL.len()),
    };
    let outcomes = generate_all(client, &ctx, settings.temperature, &mut store).await;
    let report = BatchReport::assemble(&ctx, outcomes);
    let outputs = store.stored;

    let path = settings
        .output_dir
        .join(format!("project_{}_{file_id}.docx", project.id));
    write_document(&report.document, &path).await?;
    let file = mark_done(pool, file_id, &path).await?;

    let failures = report.failures();
    tracing::info!(
        project_id = project.id,
        file_id,
        stored = outputs.len(),
        failed = failures.len(),
        "Project document generated",
    );
    Ok(GeneratedDocument {
        file,
        outputs,
        failures,
    })
}

/// Serialize `document` and write it to `path`, creating parent directories.
pub(crate) async fn write_document(document: &Document, path: &Path) -> Result<(), PipelineError> {
    let bytes = document.to_docx()?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await?;
    tracing::debug!(path = %path.display(), "Document written");
    Ok(())
}

pub(crate) async fn mark_done(
    pool: &PgPool,
    file_id: DbId,
    path: &Path,
) -> Result<FileRecord, PipelineError> {
    let output_path = path.to_string_lossy();
    FileRecordRepo::set_status(pool, file_id, FileStatus::Done, Some(&*output_path), None)
        .await?
        .ok_or_else(|| {
            CoreError::Conflict(format!("File {file_id} already left the UPLOADED state")).into()
        })
}

/// Record `error` on the file. A failure to do so is logged, not returned.
pub(crate) async fn mark_failed(pool: &PgPool, file_id: DbId, error: &PipelineError) {
    let message = error.to_string();
    let result =
        FileRecordRepo::set_status(pool, file_id, FileStatus::Error, None, Some(message.as_str()))
            .await;
    match result {
        Ok(_) => tracing::warn!(file_id, error = %message, "File marked as failed"),
        Err(e) => tracing::error!(file_id, error = %e, "Failed to record file error"),
    }
}
