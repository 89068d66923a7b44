//! Repository for the `projects` table.

use schemasmith_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, domain, primary_entity, constraints_text, advanced_feature, \
     security_access, reporting_requirement, common_tasks, created_at, updated_at";

/// Provides create/read operations for projects. Projects are immutable.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// A duplicate title fails with the `uq_projects_title` unique violation.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (title, domain, primary_entity, constraints_text,
                advanced_feature, security_access, reporting_requirement, common_tasks)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.title)
            .bind(&input.domain)
            .bind(&input.primary_entity)
            .bind(&input.constraints_text)
            .bind(&input.advanced_feature)
            .bind(&input.security_access)
            .bind(&input.reporting_requirement)
            .bind(&input.common_tasks)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project by exact title.
    pub async fn find_by_title(
        pool: &PgPool,
        title: &str,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE title = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(title)
            .fetch_optional(pool)
            .await
    }

    /// List projects, newest first.
    pub async fn list(pool: &PgPool, limit: i64) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY id DESC LIMIT $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
