//! Batch generation and single-action behaviour against a scripted
//! completion double. No database involved.

mod common;

use assert_matches::assert_matches;
use async_trait::async_trait;
use schemasmith_core::action::ActionKey;
use schemasmith_core::document::Block;
use schemasmith_core::prompt::SYSTEM_INSTRUCTIONS;
use schemasmith_llm::CompletionError;
use schemasmith_core::error::CoreError;
use schemasmith_pipeline::{
    generate_all, run_action, ActionOutput, BatchReport, OutcomeSink, PipelineError,
};

use common::{library_context, ScriptedClient};

const SERVER: &str = "https://plantuml.example";

/// Records the action of every output it receives and rejects one action.
#[derive(Default)]
struct RecordingSink {
    accepted: Vec<ActionKey>,
    reject: Option<ActionKey>,
}

#[async_trait]
impl OutcomeSink for RecordingSink {
    async fn accept(&mut self, output: &ActionOutput) -> Result<(), PipelineError> {
        if self.reject == Some(output.action) {
            return Err(CoreError::Internal("disk full".into()).into());
        }
        self.accepted.push(output.action);
        Ok(())
    }
}

#[tokio::test]
async fn one_failure_does_not_stop_the_batch() {
    let client = ScriptedClient::new([Err(CompletionError::EmptyCompletion)]);
    let ctx = library_context();

    let outcomes = generate_all(&client, &ctx, 0.2, &mut ()).await;
    assert_eq!(outcomes.len(), 7);
    assert_eq!(client.requests().len(), 7);

    let report = BatchReport::assemble(&ctx, outcomes);
    assert!(report.has_failures());
    assert_eq!(
        report.failures(),
        vec!["business_rules: Completion service returned an empty response"]
    );
    assert_eq!(report.outcomes.iter().filter(|o| o.is_success()).count(), 6);

    let titles = report.document.section_titles();
    assert_eq!(titles.len(), 7);
    assert_eq!(titles[0], "Business Rules (ERROR)");
    assert_eq!(titles.iter().filter(|t| t.ends_with("(ERROR)")).count(), 1);
    assert_eq!(titles[6], "Report Queries");
}

#[tokio::test]
async fn actions_run_in_fixed_order() {
    let client = ScriptedClient::ok();
    let outcomes = generate_all(&client, &library_context(), 0.2, &mut ()).await;
    let order: Vec<ActionKey> = outcomes.iter().map(|o| o.action).collect();
    assert_eq!(order, ActionKey::ALL.to_vec());
    assert!(outcomes.iter().all(|o| o.is_success()));
}

#[tokio::test]
async fn sink_receives_each_success_in_order() {
    let client = ScriptedClient::new([Ok("a".to_string()), Err(CompletionError::EmptyCompletion)]);
    let mut sink = RecordingSink::default();

    let outcomes = generate_all(&client, &library_context(), 0.2, &mut sink).await;

    assert_eq!(outcomes.len(), 7);
    let expected: Vec<ActionKey> = ActionKey::ALL
        .into_iter()
        .filter(|a| *a != ActionKey::ErTables)
        .collect();
    assert_eq!(sink.accepted, expected);
}

#[tokio::test]
async fn rejected_output_fails_only_its_action() {
    let client = ScriptedClient::ok();
    let mut sink = RecordingSink {
        reject: Some(ActionKey::SqlScript),
        ..Default::default()
    };
    let ctx = library_context();

    let report = BatchReport::assemble(&ctx, generate_all(&client, &ctx, 0.2, &mut sink).await);

    assert_eq!(sink.accepted.len(), 6);
    assert_eq!(report.failures(), vec!["sql_script: Internal error: disk full"]);
    assert!(report
        .document
        .section_titles()
        .contains(&"SQL Script (ERROR)"));
}

#[tokio::test]
async fn table_output_becomes_a_document_table() {
    // business_rules, then er_tables.
    let client = ScriptedClient::new([
        Ok("- rule one".to_string()),
        Ok("| Table | Column |\n|---|---|\n| book | id |".to_string()),
    ]);
    let ctx = library_context();
    let report = BatchReport::assemble(&ctx, generate_all(&client, &ctx, 0.2, &mut ()).await);

    let tables: Vec<_> = report
        .document
        .blocks()
        .iter()
        .filter_map(|b| match b {
            Block::Table { table } => Some(table),
            _ => None,
        })
        .collect();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].header, vec!["Table", "Column"]);
    assert_eq!(tables[0].rows, vec![vec!["book".to_string(), "id".to_string()]]);
    assert!(!report.has_failures());
}

#[tokio::test]
async fn run_action_sends_system_prompt_and_temperature() {
    let client = ScriptedClient::ok();
    let output = run_action(&client, &library_context(), ActionKey::SqlScript, 0.7)
        .await
        .unwrap();

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].system, SYSTEM_INSTRUCTIONS);
    assert_eq!(requests[0].temperature, 0.7);
    assert!(requests[0].prompt.contains("PROJECT TITLE: Library System"));
    assert_eq!(output.prompt, requests[0].prompt);
    assert_eq!(output.text, "ok");
    assert_eq!(output.model, common::SCRIPTED_MODEL);
    assert_eq!(output.diagram_url(SERVER), None);
}

#[tokio::test]
async fn diagram_output_is_sanitized_and_linked() {
    let client = ScriptedClient::new([Ok("entity Book {\n  id,\n}".to_string())]);
    let output = run_action(&client, &library_context(), ActionKey::ErPlantuml, 0.2)
        .await
        .unwrap();

    assert_eq!(
        output.text,
        "```plantuml\n@startuml\nentity Book {\n  id\n}\n@enduml\n```"
    );
    let url = output.diagram_url(SERVER).unwrap();
    assert!(url.starts_with("https://plantuml.example/svg/"), "{url}");
}

#[tokio::test]
async fn run_action_propagates_completion_errors() {
    let client = ScriptedClient::new([Err(CompletionError::Api {
        status: 401,
        body: "invalid api key".into(),
    })]);
    assert_matches!(
        run_action(&client, &library_context(), ActionKey::Report, 0.2).await,
        Err(PipelineError::Completion(CompletionError::Api { status: 401, .. }))
    );
}
