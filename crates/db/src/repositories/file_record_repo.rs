//! Repository for the `files` table.

use schemasmith_core::types::DbId;
use sqlx::PgPool;

use crate::models::file_record::{CreateFileRecord, FileRecord};
use crate::models::status::FileStatus;

const COLUMNS: &str = "id, original_name, mime_type, input_path, output_path, status_id, \
     error_message, created_at, updated_at";

/// Provides lifecycle operations for file records.
pub struct FileRecordRepo;

impl FileRecordRepo {
    /// Insert a record in the `UPLOADED` state.
    pub async fn create(
        pool: &PgPool,
        input: &CreateFileRecord,
    ) -> Result<FileRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO files (original_name, mime_type, input_path, status_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FileRecord>(&query)
            .bind(&input.original_name)
            .bind(&input.mime_type)
            .bind(&input.input_path)
            .bind(FileStatus::Uploaded.id())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<FileRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM files WHERE id = $1");
        sqlx::query_as::<_, FileRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List records, newest first.
    pub async fn list(pool: &PgPool, limit: i64) -> Result<Vec<FileRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM files ORDER BY id DESC LIMIT $1");
        sqlx::query_as::<_, FileRecord>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Move an `UPLOADED` record to a terminal status.
    ///
    /// `output_path` is kept when `None` is passed. Returns `None` if the row
    /// does not exist or has already left `UPLOADED`.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: FileStatus,
        output_path: Option<&str>,
        error_message: Option<&str>,
    ) -> Result<Option<FileRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE files SET
                status_id = $2,
                output_path = COALESCE($3, output_path),
                error_message = $4
             WHERE id = $1 AND status_id = $5
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FileRecord>(&query)
            .bind(id)
            .bind(status.id())
            .bind(output_path)
            .bind(error_message)
            .bind(FileStatus::Uploaded.id())
            .fetch_optional(pool)
            .await
    }
}
