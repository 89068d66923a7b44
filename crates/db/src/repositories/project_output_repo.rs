//! Repository for the append-only `project_outputs` table.

use schemasmith_core::action::ActionKey;
use schemasmith_core::types::DbId;
use sqlx::PgPool;

use crate::models::project_output::{CreateProjectOutput, ProjectOutput};

const COLUMNS: &str =
    "id, project_id, action_key, prompt_text, output_text, model, temperature, created_at";

/// Provides insert and history queries for project outputs.
pub struct ProjectOutputRepo;

impl ProjectOutputRepo {
    /// Append a new output row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProjectOutput,
    ) -> Result<ProjectOutput, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_outputs
                (project_id, action_key, prompt_text, output_text, model, temperature)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectOutput>(&query)
            .bind(input.project_id)
            .bind(input.action.as_str())
            .bind(&input.prompt_text)
            .bind(&input.output_text)
            .bind(&input.model)
            .bind(input.temperature)
            .fetch_one(pool)
            .await
    }

    /// The most recent output for one action (highest id wins).
    pub async fn find_latest(
        pool: &PgPool,
        project_id: DbId,
        action: ActionKey,
    ) -> Result<Option<ProjectOutput>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_outputs
             WHERE project_id = $1 AND action_key = $2
             ORDER BY id DESC LIMIT 1"
        );
        sqlx::query_as::<_, ProjectOutput>(&query)
            .bind(project_id)
            .bind(action.as_str())
            .fetch_optional(pool)
            .await
    }

    /// The most recent output of every action that has one, ordered by id.
    pub async fn latest_per_action(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectOutput>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM (
                SELECT DISTINCT ON (action_key) {COLUMNS} FROM project_outputs
                WHERE project_id = $1
                ORDER BY action_key, id DESC
             ) latest
             ORDER BY id"
        );
        sqlx::query_as::<_, ProjectOutput>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Output history for a project, newest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
        limit: i64,
    ) -> Result<Vec<ProjectOutput>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_outputs
             WHERE project_id = $1
             ORDER BY id DESC LIMIT $2"
        );
        sqlx::query_as::<_, ProjectOutput>(&query)
            .bind(project_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
