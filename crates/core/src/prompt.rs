//! Prompt templates for the seven generation actions.
//!
//! Each template carries its own output-format contract (table only, fenced
//! PlantUML only, ...). The project's eight descriptive fields are rendered
//! into a labelled context block and substituted at the `{context}` marker.

use serde::{Deserialize, Serialize};

use crate::action::ActionKey;
use crate::error::CoreError;

/// Persona sent as the system message on every completion request.
pub const SYSTEM_INSTRUCTIONS: &str = "You are a database design assistant.
Produce the requested output from the project information the user provides.
Write the output with clear headings and bullet points.
Do not add unnecessary explanation; give the result directly.";

/// Marker replaced with the rendered project context.
const CONTEXT_MARKER: &str = "{context}";

/// The descriptive fields of a project that every prompt embeds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectContext {
    pub title: String,
    pub domain: String,
    pub primary_entity: String,
    pub constraints_text: String,
    pub advanced_feature: String,
    pub security_access: String,
    pub reporting_requirement: String,
    pub common_tasks: String,
}

/// Render the labelled context block shared by all templates.
pub fn project_context(ctx: &ProjectContext) -> String {
    format!(
        "PROJECT TITLE: {}\n\
         DOMAIN: {}\n\
         PRIMARY ENTITY: {}\n\
         CONSTRAINT / RULE: {}\n\
         ADVANCED FEATURE: {}\n\
         SECURITY / ACCESS CONTROL: {}\n\
         REPORTING REQUIREMENT: {}\n\
         COMMON TASKS: {}",
        ctx.title,
        ctx.domain,
        ctx.primary_entity,
        ctx.constraints_text,
        ctx.advanced_feature,
        ctx.security_access,
        ctx.reporting_requirement,
        ctx.common_tasks,
    )
    .trim()
    .to_string()
}

fn template(action: ActionKey) -> &'static str {
    match action {
        ActionKey::BusinessRules => BUSINESS_RULES,
        ActionKey::ErTables => ER_TABLES,
        ActionKey::MissingRules => MISSING_RULES,
        ActionKey::Normalization => NORMALIZATION,
        ActionKey::ErPlantuml => ER_PLANTUML,
        ActionKey::SqlScript => SQL_SCRIPT,
        ActionKey::Report => REPORT,
    }
}

/// Build the user prompt for `action` from the project's fields.
pub fn build_prompt(ctx: &ProjectContext, action: ActionKey) -> String {
    template(action).replacen(CONTEXT_MARKER, &project_context(ctx), 1)
}

/// Prompt for completing a free-form uploaded document.
pub fn document_completion_prompt(input_text: &str) -> Result<String, CoreError> {
    if input_text.trim().is_empty() {
        return Err(CoreError::Validation(
            "Document text to send for completion is empty".to_string(),
        ));
    }
    Ok(format!(
        "Complete the following document according to the project brief.\n\
         Give the output with organised headings and bullet points.\n\n\
         === DOCUMENT ===\n\
         {input_text}\n\
         === END ==="
    ))
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

const BUSINESS_RULES: &str = "
Produce the Business Rules for the project below and return them ONLY as a table.

REQUIRED FORMAT:
- Columns, in this order:
  BR-ID | Type | Rule | ER Impact | Implementation Hint | Rationale
- BR-ID format: BR-01, BR-02, ... (at least 12 rules)
- Type: one of \"Structural\", \"Behavioral\" or \"Security\"
- ER Impact: the relationship/constraint effect (e.g. User (1)-Subscription (N), UNIQUE, CHECK, M:N junction table)
- Implementation Hint: how to enforce it in MySQL (UNIQUE, FK, CHECK, trigger, view, ...)
- NEVER write extra explanation, headings or bullet points. Only the table.

=== PROJECT ===
{context}
=== OUTPUT ===
";

const ER_TABLES: &str = "
Build the ER tables for the project below.
- First the entity list
- Then for every table: PK, important fields, FK
- State the relationships (1-N, N-N)
- Aim for 7-12 tables depending on the domain
- Only a table
- NEVER write extra explanation, headings or bullet points. Only the table.

=== PROJECT ===
{context}
=== OUTPUT ===
";

const MISSING_RULES: &str = "
Identify the missing or overlooked rules for the project below.
- Suggest at least 10 items
- Group them under 3 headings: Data Integrity, Process/Workflow, Security/Access
- Each item is \"rule + short rationale\"

=== PROJECT ===
{context}
=== OUTPUT ===
";

const NORMALIZATION: &str = "
Produce a 0NF -> 1NF -> 2NF -> 3NF normalization walkthrough for the project below and return it ONLY as tables.
- Only produce tables
- Start from an assumed raw example table (or tables)
- Write out the tables produced at 1NF, 2NF and 3NF one by one
- Explain the reason for each step in 1-2 lines
- Finish with the \"Final 3NF Schema\" summarised table by table
- Only produce tables

=== PROJECT ===
{context}
=== OUTPUT ===
";

const ER_PLANTUML: &str = "
Produce a PlantUML ER diagram for the project below.

MANDATORY RULES:
- The output is ONLY a PlantUML code block: ```plantuml ... ```
- The first line is @startuml and the last line is @enduml.
- No line may end with a comma (,).
- Do not use commas in field lists. Every field goes on its own line.
- Do not use commas in relationships.
- Entities use this format:

entity TableName {
  *id : INT <<PK>>
  user_id : INT <<FK>>
  name : VARCHAR
}

- Relationship format examples:
User ||--o{ Subscription : has
Content }o--o{ Platform : available_on

=== PROJECT ===
{context}
=== OUTPUT ===
";

const SQL_SCRIPT: &str = "
Produce a MySQL SQL script for the project below.
- CREATE TABLE statements (PK/FK/UNIQUE, CHECK where possible)
- Sample INSERTs (2-3 rows per table)
- At least 1 trigger or 1 stored procedure matching the constraints/rules
- A sample user/GRANT for role-based access

=== PROJECT ===
{context}
=== OUTPUT ===
";

const REPORT: &str = "
Produce reporting queries for the project below.
- 5 report queries matching the reporting requirement
- At least 1 uses JOIN + GROUP BY
- At least 1 is built as a MySQL VIEW

=== PROJECT ===
{context}
=== OUTPUT ===
";
