//! Pipeline runs that write to the database and the filesystem.

mod common;

use assert_matches::assert_matches;
use schemasmith_core::action::ActionKey;
use schemasmith_core::docx;
use schemasmith_core::error::CoreError;
use schemasmith_db::models::project::{CreateProject, Project};
use schemasmith_db::models::status::FileStatus;
use schemasmith_db::repositories::{FileRecordRepo, ProjectOutputRepo, ProjectRepo};
use schemasmith_llm::CompletionError;
use schemasmith_pipeline::{
    complete_document, execute_action, generate_for_project, PipelineError, PipelineSettings,
    UploadedDocument,
};
use sqlx::PgPool;
use tempfile::TempDir;

use common::ScriptedClient;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn library_project(pool: &PgPool) -> Project {
    let input = CreateProject {
        title: "Library System".into(),
        domain: "Education".into(),
        primary_entity: "Book".into(),
        ..Default::default()
    };
    ProjectRepo::create(pool, &input).await.unwrap()
}

fn settings(dir: &TempDir) -> PipelineSettings {
    let mut settings = PipelineSettings::new(dir.path().join("out"), dir.path().join("uploads"));
    settings.plantuml_server = "https://plantuml.example".into();
    settings
}

// ---------------------------------------------------------------------------
// Single action
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_execute_action_stores_output(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let project = library_project(&pool).await;
    let client = ScriptedClient::new([Ok("```plantuml\nentity Book\n```".to_string())]);

    let executed = execute_action(&pool, &client, &project, ActionKey::ErPlantuml, &settings(&dir))
        .await
        .unwrap();

    assert_eq!(executed.output.action(), Some(ActionKey::ErPlantuml));
    assert_eq!(
        executed.output.output_text,
        "```plantuml\n@startuml\nentity Book\n@enduml\n```"
    );
    assert_eq!(executed.output.model, common::SCRIPTED_MODEL);
    assert!(executed
        .diagram_url
        .unwrap()
        .starts_with("https://plantuml.example/svg/"));

    let latest = ProjectOutputRepo::find_latest(&pool, project.id, ActionKey::ErPlantuml)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.id, executed.output.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_execute_action_failure_stores_nothing(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let project = library_project(&pool).await;
    let client = ScriptedClient::new([Err(CompletionError::EmptyCompletion)]);

    let result = execute_action(&pool, &client, &project, ActionKey::Report, &settings(&dir)).await;
    assert_matches!(
        result,
        Err(PipelineError::Completion(CompletionError::EmptyCompletion))
    );
    let history = ProjectOutputRepo::list_by_project(&pool, project.id, 10)
        .await
        .unwrap();
    assert!(history.is_empty());
}

// ---------------------------------------------------------------------------
// Generate all
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_generate_for_project_with_one_failure(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let project = library_project(&pool).await;
    let client = ScriptedClient::new([
        Ok("- rule".to_string()),
        Err(CompletionError::EmptyCompletion),
    ]);

    let generated = generate_for_project(&pool, &client, &project, &settings(&dir))
        .await
        .unwrap();

    assert_eq!(generated.failures, vec![
        "er_tables: Completion service returned an empty response".to_string()
    ]);
    assert_eq!(generated.outputs.len(), 6);
    assert_eq!(generated.file.status(), Some(FileStatus::Done));
    assert_eq!(generated.file.original_name, "Library_System.docx");

    let path = generated.file.downloadable_path().unwrap();
    let text = docx::extract_text(&std::fs::read(path).unwrap()).unwrap();
    assert!(text.contains("Library System"));
    assert!(text.contains("ER Tables (ERROR)"));
    assert!(text.contains("- rule"));

    let history = ProjectOutputRepo::list_by_project(&pool, project.id, 50)
        .await
        .unwrap();
    assert_eq!(history.len(), 6);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_generate_for_project_storage_failure_marks_error(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let settings = PipelineSettings::new(blocker.join("out"), dir.path().join("uploads"));

    let project = library_project(&pool).await;
    let result = generate_for_project(&pool, &ScriptedClient::ok(), &project, &settings).await;
    assert_matches!(result, Err(PipelineError::Io(_)));

    let files = FileRecordRepo::list(&pool, 10).await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].status(), Some(FileStatus::Error));
    assert!(files[0].error_message.is_some());

    // Outputs were stored as each action resolved, before the write failed.
    let history = ProjectOutputRepo::list_by_project(&pool, project.id, 50)
        .await
        .unwrap();
    assert_eq!(history.len(), 7);
}

// ---------------------------------------------------------------------------
// Document completion upload
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_text_upload_is_completed(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let client = ScriptedClient::new([Ok("# Tables\n- book\n- member".to_string())]);
    let upload = UploadedDocument {
        file_name: "brief.txt",
        bytes: b"  A library lends books to members.  ",
    };

    let file = complete_document(&pool, &client, &settings(&dir), upload)
        .await
        .unwrap();

    assert_eq!(file.status(), Some(FileStatus::Done));
    assert_eq!(file.original_name, "brief.txt");
    assert_eq!(file.mime_type, "text/plain");
    assert_eq!(
        std::fs::read(&file.input_path).unwrap(),
        b"  A library lends books to members.  "
    );

    let prompt = &client.requests()[0].prompt;
    assert!(prompt.contains("=== DOCUMENT ===\nA library lends books to members.\n=== END ==="));

    let answer = docx::extract_text(&std::fs::read(file.downloadable_path().unwrap()).unwrap())
        .unwrap();
    assert_eq!(answer, "# Tables\n- book\n- member");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upload_completion_failure_marks_error(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let client = ScriptedClient::new([Err(CompletionError::Api {
        status: 429,
        body: "quota exceeded".into(),
    })]);
    let upload = UploadedDocument {
        file_name: "brief.txt",
        bytes: b"hello",
    };

    let result = complete_document(&pool, &client, &settings(&dir), upload).await;
    assert_matches!(result, Err(PipelineError::Completion(_)));

    let files = FileRecordRepo::list(&pool, 10).await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].status(), Some(FileStatus::Error));
    assert!(files[0]
        .error_message
        .as_deref()
        .unwrap()
        .contains("quota exceeded"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blank_upload_marks_error_without_completion(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let client = ScriptedClient::ok();
    let upload = UploadedDocument {
        file_name: "empty.txt",
        bytes: b"   \n ",
    };

    let result = complete_document(&pool, &client, &settings(&dir), upload).await;
    assert_matches!(result, Err(PipelineError::Core(CoreError::Validation(_))));
    assert!(client.requests().is_empty());

    let files = FileRecordRepo::list(&pool, 10).await.unwrap();
    assert_eq!(files[0].status(), Some(FileStatus::Error));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_record_insert_removes_stored_upload(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    pool.close().await;
    let upload = UploadedDocument {
        file_name: "brief.txt",
        bytes: b"hello",
    };

    let result = complete_document(&pool, &ScriptedClient::ok(), &settings, upload).await;
    assert_matches!(result, Err(PipelineError::Database(_)));

    let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("uploads"))
        .unwrap()
        .collect();
    assert!(leftovers.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unsupported_upload_is_rejected_before_storing(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let upload = UploadedDocument {
        file_name: "slides.pdf",
        bytes: b"%PDF",
    };

    let result = complete_document(&pool, &ScriptedClient::ok(), &settings(&dir), upload).await;
    assert_matches!(result, Err(PipelineError::Core(CoreError::Validation(_))));
    assert!(FileRecordRepo::list(&pool, 10).await.unwrap().is_empty());
    assert!(!dir.path().join("uploads").exists());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_oversized_upload_is_rejected_before_storing(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let mut settings = settings(&dir);
    settings.max_upload_bytes = 4;
    let upload = UploadedDocument {
        file_name: "brief.txt",
        bytes: b"hello",
    };

    let result = complete_document(&pool, &ScriptedClient::ok(), &settings, upload).await;
    assert_matches!(result, Err(PipelineError::Core(CoreError::Validation(_))));
    assert!(FileRecordRepo::list(&pool, 10).await.unwrap().is_empty());
}
