//! "Generate all": run every action once and assemble the results.
//!
//! Each action moves from pending to success or failure on its own; a
//! failure is recorded in its [`ActionOutcome`] and never stops the rest.

use async_trait::async_trait;
use schemasmith_core::action::ActionKey;
use schemasmith_core::document::{Document, Preamble, Section};
use schemasmith_core::prompt::ProjectContext;
use schemasmith_llm::CompletionClient;

use crate::action::{run_action, ActionOutput};
use crate::error::PipelineError;

/// Result of one action within a batch.
#[derive(Debug)]
pub struct ActionOutcome {
    pub action: ActionKey,
    pub result: Result<ActionOutput, PipelineError>,
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Receives each successful output as soon as its action resolves.
#[async_trait]
pub trait OutcomeSink: Send {
    /// An error here turns the action into a failure.
    async fn accept(&mut self, output: &ActionOutput) -> Result<(), PipelineError>;
}

/// Keeps nothing.
#[async_trait]
impl OutcomeSink for () {
    async fn accept(&mut self, _output: &ActionOutput) -> Result<(), PipelineError> {
        Ok(())
    }
}

/// Run all seven actions sequentially, in [`ActionKey::ALL`] order, handing
/// every success to `sink` before the next action starts.
pub async fn generate_all(
    client: &dyn CompletionClient,
    ctx: &ProjectContext,
    temperature: f64,
    sink: &mut dyn OutcomeSink,
) -> Vec<ActionOutcome> {
    let mut outcomes = Vec::with_capacity(ActionKey::ALL.len());
    for action in ActionKey::ALL {
        let result = match run_action(client, ctx, action, temperature).await {
            Ok(output) => match sink.accept(&output).await {
                Ok(()) => Ok(output),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            tracing::warn!(action = %action, error = %e, "Action failed; continuing batch");
        }
        outcomes.push(ActionOutcome { action, result });
    }
    outcomes
}

/// Outcomes of a batch together with the document built from them.
#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<ActionOutcome>,
    pub document: Document,
}

impl BatchReport {
    /// Assemble the document: preamble, then one section per outcome.
    ///
    /// Failed actions become a section titled `"{title} (ERROR)"` whose body
    /// is the error message.
    pub fn assemble(ctx: &ProjectContext, outcomes: Vec<ActionOutcome>) -> Self {
        let messages: Vec<Option<String>> = outcomes
            .iter()
            .map(|o| o.result.as_ref().err().map(ToString::to_string))
            .collect();
        let sections = outcomes.iter().zip(&messages).map(|(outcome, message)| {
            let title = outcome.action.section_title();
            match (&outcome.result, message) {
                (Ok(output), _) => Section::new(title, &output.text, outcome.action.allows_table()),
                (Err(_), message) => {
                    Section::failed(title, message.as_deref().unwrap_or_default())
                }
            }
        });

        let document = Document::assemble(
            &Preamble {
                title: &ctx.title,
                domain: &ctx.domain,
                primary_entity: &ctx.primary_entity,
            },
            sections,
        );

        Self { outcomes, document }
    }

    /// `"action_key: message"` for every failed action, in batch order.
    pub fn failures(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.result {
                Err(e) => Some(format!("{}: {e}", o.action)),
                Ok(_) => None,
            })
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| !o.is_success())
    }
}
