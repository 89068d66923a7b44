//! Generated output entity model and DTOs.

use schemasmith_core::action::ActionKey;
use schemasmith_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the append-only `project_outputs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectOutput {
    pub id: DbId,
    pub project_id: DbId,
    pub action_key: String,
    pub prompt_text: String,
    pub output_text: String,
    pub model: String,
    pub temperature: f64,
    pub created_at: Timestamp,
}

impl ProjectOutput {
    /// Parsed action key. The CHECK constraint keeps stored keys valid.
    pub fn action(&self) -> Option<ActionKey> {
        self.action_key.parse().ok()
    }
}

/// DTO for recording one completion result.
#[derive(Debug, Clone)]
pub struct CreateProjectOutput {
    pub project_id: DbId,
    pub action: ActionKey,
    pub prompt_text: String,
    pub output_text: String,
    pub model: String,
    pub temperature: f64,
}
