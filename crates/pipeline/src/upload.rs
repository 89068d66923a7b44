//! Document completion: an uploaded `.docx`/`.txt` goes through the
//! completion service and the answer comes back as a new `.docx`.

use schemasmith_core::document::Document;
use schemasmith_core::prompt::{document_completion_prompt, SYSTEM_INSTRUCTIONS};
use schemasmith_core::upload::{
    classify_upload, extract_text, secure_file_name, validate_upload_size, UploadKind,
};
use schemasmith_db::models::file_record::{CreateFileRecord, FileRecord};
use schemasmith_db::repositories::FileRecordRepo;
use schemasmith_llm::{CompletionClient, CompletionRequest};
use sqlx::PgPool;

use crate::error::PipelineError;
use crate::persist::{mark_done, mark_failed, write_document};
use crate::settings::PipelineSettings;

/// A file as received from the client.
#[derive(Debug, Clone, Copy)]
pub struct UploadedDocument<'a> {
    pub file_name: &'a str,
    pub bytes: &'a [u8],
}

/// Store the upload, ask the completion service to complete it and write
/// the answer as a `.docx`.
///
/// Type and size are checked before anything is stored. If the file record
/// cannot be inserted the stored input is removed again. Once the record
/// exists, any failure moves it to `ERROR` and is returned.
pub async fn complete_document(
    pool: &PgPool,
    client: &dyn CompletionClient,
    settings: &PipelineSettings,
    upload: UploadedDocument<'_>,
) -> Result<FileRecord, PipelineError> {
    let kind = classify_upload(upload.file_name)?;
    validate_upload_size(upload.bytes.len(), settings.max_upload_bytes)?;

    let stored_name = format!(
        "{}_{}",
        chrono::Utc::now().format("%Y%m%d%H%M%S%3f"),
        secure_file_name(upload.file_name)
    );
    let input_path = settings.upload_dir.join(stored_name);
    tokio::fs::create_dir_all(&settings.upload_dir).await?;
    tokio::fs::write(&input_path, upload.bytes).await?;

    let created = FileRecordRepo::create(
        pool,
        &CreateFileRecord {
            original_name: upload.file_name.to_string(),
            mime_type: kind.mime_type().to_string(),
            input_path: input_path.to_string_lossy().into_owned(),
        },
    )
    .await;
    let file = match created {
        Ok(file) => file,
        Err(e) => {
            if let Err(remove_err) = tokio::fs::remove_file(&input_path).await {
                tracing::warn!(
                    path = %input_path.display(),
                    error = %remove_err,
                    "Failed to remove unrecorded upload",
                );
            }
            return Err(e.into());
        }
    };
    tracing::info!(file_id = file.id, name = %upload.file_name, size = upload.bytes.len(), "Upload stored");

    match answer(pool, client, settings, &file, kind, upload.bytes).await {
        Ok(done) => Ok(done),
        Err(e) => {
            mark_failed(pool, file.id, &e).await;
            Err(e)
        }
    }
}

async fn answer(
    pool: &PgPool,
    client: &dyn CompletionClient,
    settings: &PipelineSettings,
    file: &FileRecord,
    kind: UploadKind,
    bytes: &[u8],
) -> Result<FileRecord, PipelineError> {
    let text = extract_text(kind, bytes)?;
    let prompt = document_completion_prompt(&text)?;
    let request =
        CompletionRequest::new(SYSTEM_INSTRUCTIONS, prompt).with_temperature(settings.temperature);
    let completion = client.complete(&request).await?;

    let path = settings
        .output_dir
        .join(format!("file_{}_completed.docx", file.id));
    write_document(&Document::from_text(&completion.text), &path).await?;
    mark_done(pool, file.id, &path).await
}
