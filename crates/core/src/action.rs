//! The seven artifact-generation actions a project supports.
//!
//! The action key is the stable string identifier stored in
//! `project_outputs.action_key` and used in route paths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One of the fixed artifact types generated for a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKey {
    BusinessRules,
    ErTables,
    MissingRules,
    Normalization,
    ErPlantuml,
    SqlScript,
    Report,
}

impl ActionKey {
    /// Every action, in the order the "generate all" document lists them.
    pub const ALL: [ActionKey; 7] = [
        ActionKey::BusinessRules,
        ActionKey::ErTables,
        ActionKey::MissingRules,
        ActionKey::Normalization,
        ActionKey::ErPlantuml,
        ActionKey::SqlScript,
        ActionKey::Report,
    ];

    /// Stable key stored in the database and accepted in URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKey::BusinessRules => "business_rules",
            ActionKey::ErTables => "er_tables",
            ActionKey::MissingRules => "missing_rules",
            ActionKey::Normalization => "normalization",
            ActionKey::ErPlantuml => "er_plantuml",
            ActionKey::SqlScript => "sql_script",
            ActionKey::Report => "report",
        }
    }

    /// Human-readable heading used for this action's document section.
    pub fn section_title(self) -> &'static str {
        match self {
            ActionKey::BusinessRules => "Business Rules",
            ActionKey::ErTables => "ER Tables",
            ActionKey::MissingRules => "Missing Rules",
            ActionKey::Normalization => "Normalization (0NF → 3NF)",
            ActionKey::ErPlantuml => "ER Diagram (PlantUML)",
            ActionKey::SqlScript => "SQL Script",
            ActionKey::Report => "Report Queries",
        }
    }

    /// Whether the document assembler may render this action's output as a table.
    ///
    /// Diagram source is always kept verbatim.
    pub fn allows_table(self) -> bool {
        !matches!(self, ActionKey::ErPlantuml)
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKey::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| CoreError::InvalidAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_every_known_key() {
        for action in ActionKey::ALL {
            assert_eq!(action.as_str().parse::<ActionKey>().unwrap(), action);
        }
    }

    #[test]
    fn unknown_key_is_invalid_action() {
        assert_matches!(
            "erd".parse::<ActionKey>(),
            Err(CoreError::InvalidAction(key)) if key == "erd"
        );
    }

    #[test]
    fn keys_are_case_sensitive() {
        assert!("Report".parse::<ActionKey>().is_err());
    }

    #[test]
    fn only_diagram_disallows_tables() {
        let disallowed: Vec<_> = ActionKey::ALL
            .into_iter()
            .filter(|a| !a.allows_table())
            .collect();
        assert_eq!(disallowed, vec![ActionKey::ErPlantuml]);
    }

    #[test]
    fn serde_uses_snake_case_keys() {
        let json = serde_json::to_string(&ActionKey::SqlScript).unwrap();
        assert_eq!(json, "\"sql_script\"");
    }
}
