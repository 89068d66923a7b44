//! Handlers for the `/files` resource.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use schemasmith_core::docx::DOCX_MIME_TYPE;
use schemasmith_core::error::CoreError;
use schemasmith_core::types::DbId;
use schemasmith_core::upload::secure_file_name;
use schemasmith_db::models::file_record::FileRecord;
use schemasmith_db::models::status::FileStatus;
use schemasmith_db::repositories::FileRecordRepo;
use schemasmith_pipeline::{complete_document, UploadedDocument};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::run_detached;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum number of file records returned by the list endpoint.
const FILE_LIST_LIMIT: i64 = 200;

/// Relative URL a finished document can be fetched from.
pub fn download_url(file_id: DbId) -> String {
    format!("/api/v1/files/{file_id}/download")
}

/// A file record with its status name and download link.
#[derive(Debug, Serialize)]
pub struct FileView {
    #[serde(flatten)]
    pub record: FileRecord,
    pub status: Option<FileStatus>,
    /// Present once the file is downloadable.
    pub download_url: Option<String>,
}

impl From<FileRecord> for FileView {
    fn from(record: FileRecord) -> Self {
        let url = record.downloadable_path().map(|_| download_url(record.id));
        Self {
            status: record.status(),
            download_url: url,
            record,
        }
    }
}

/// Name offered to the browser for the finished document.
///
/// Generated documents keep their name; completed uploads get a
/// `_completed.docx` suffix since the output is always `.docx`.
fn attachment_name(record: &FileRecord) -> String {
    let stem = std::path::Path::new(&record.original_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let stem = secure_file_name(stem);
    if record.input_path.is_empty() {
        format!("{stem}.docx")
    } else {
        format!("{stem}_completed.docx")
    }
}

/// GET /api/v1/files
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<FileView>>>> {
    let files = FileRecordRepo::list(&state.pool, FILE_LIST_LIMIT).await?;
    Ok(Json(DataResponse {
        data: files.into_iter().map(FileView::from).collect(),
    }))
}

/// POST /api/v1/files
///
/// Accepts a multipart form with a required `file` field (`.docx` or
/// `.txt`). The document is completed before the response is sent; the
/// response carries the finished record.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<FileView>>)> {
    let mut file_data: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        file_data = Some((filename, data.to_vec()));
    }

    let (filename, data) =
        file_data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    if filename.trim().is_empty() {
        return Err(AppError::BadRequest("No file selected".into()));
    }

    let pool = state.pool.clone();
    let client = Arc::clone(&state.completion);
    let settings = Arc::clone(&state.pipeline);
    let record = run_detached(async move {
        let upload = UploadedDocument {
            file_name: &filename,
            bytes: &data,
        };
        complete_document(&pool, client.as_ref(), &settings, upload).await
    })
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: FileView::from(record),
        }),
    ))
}

/// GET /api/v1/files/{id}/download
///
/// Only `DONE` records can be downloaded; anything else is a 409.
pub async fn download(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let record = FileRecordRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "File", id }))?;

    let path = record.downloadable_path().ok_or_else(|| {
        AppError::Core(CoreError::Conflict(format!(
            "File {id} is not ready for download"
        )))
    })?;

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to read {path}: {e}")))?;

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        attachment_name(&record)
    ))
    .map_err(|e| AppError::InternalError(e.to_string()))?;

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, HeaderValue::from_static(DOCX_MIME_TYPE)),
            (CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
