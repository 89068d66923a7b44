//! Generated/uploaded file entity model and DTOs.

use schemasmith_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::status::{FileStatus, StatusId};

/// A row from the `files` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FileRecord {
    pub id: DbId,
    pub original_name: String,
    pub mime_type: String,
    pub input_path: String,
    pub output_path: Option<String>,
    pub status_id: StatusId,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl FileRecord {
    pub fn status(&self) -> Option<FileStatus> {
        FileStatus::from_id(self.status_id)
    }

    /// Output path, present only once the record reached `DONE`.
    pub fn downloadable_path(&self) -> Option<&str> {
        match self.status() {
            Some(FileStatus::Done) => self.output_path.as_deref(),
            _ => None,
        }
    }
}

/// DTO for inserting a record in the `UPLOADED` state.
#[derive(Debug, Clone)]
pub struct CreateFileRecord {
    pub original_name: String,
    pub mime_type: String,
    /// Empty for generated documents that have no input file.
    pub input_path: String,
}
