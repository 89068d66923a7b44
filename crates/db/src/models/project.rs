//! Project entity model and DTOs.

use schemasmith_core::error::CoreError;
use schemasmith_core::prompt::ProjectContext;
use schemasmith_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub title: String,
    pub domain: String,
    pub primary_entity: String,
    pub constraints_text: String,
    pub advanced_feature: String,
    pub security_access: String,
    pub reporting_requirement: String,
    pub common_tasks: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// The descriptive fields embedded in every prompt.
    pub fn context(&self) -> ProjectContext {
        ProjectContext {
            title: self.title.clone(),
            domain: self.domain.clone(),
            primary_entity: self.primary_entity.clone(),
            constraints_text: self.constraints_text.clone(),
            advanced_feature: self.advanced_feature.clone(),
            security_access: self.security_access.clone(),
            reporting_requirement: self.reporting_requirement.clone(),
            common_tasks: self.common_tasks.clone(),
        }
    }
}

/// DTO for creating a new project.
///
/// Absent fields deserialize as the empty string, so a missing required
/// field is reported by [`CreateProject::normalize`] like a blank one.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateProject {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "domain is required"))]
    pub domain: String,
    #[validate(length(min = 1, message = "primary_entity is required"))]
    pub primary_entity: String,
    pub constraints_text: String,
    pub advanced_feature: String,
    pub security_access: String,
    pub reporting_requirement: String,
    pub common_tasks: String,
}

impl CreateProject {
    /// Trim every field, then check the required ones are non-empty.
    pub fn normalize(self) -> Result<Self, CoreError> {
        let trimmed = Self {
            title: self.title.trim().to_string(),
            domain: self.domain.trim().to_string(),
            primary_entity: self.primary_entity.trim().to_string(),
            constraints_text: self.constraints_text.trim().to_string(),
            advanced_feature: self.advanced_feature.trim().to_string(),
            security_access: self.security_access.trim().to_string(),
            reporting_requirement: self.reporting_requirement.trim().to_string(),
            common_tasks: self.common_tasks.trim().to_string(),
        };
        trimmed.validate().map_err(|errors| {
            let mut messages: Vec<String> = errors
                .field_errors()
                .values()
                .flat_map(|errs| errs.iter())
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .collect();
            messages.sort();
            CoreError::Validation(messages.join(", "))
        })?;
        Ok(trimmed)
    }
}
