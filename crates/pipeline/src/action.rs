//! Single-action execution: prompt, completion, sanitize.

use schemasmith_core::action::ActionKey;
use schemasmith_core::plantuml::{self, DiagramFormat};
use schemasmith_core::prompt::{build_prompt, ProjectContext, SYSTEM_INSTRUCTIONS};
use schemasmith_core::sanitize::{extract_plantuml_code, sanitize_plantuml};
use schemasmith_llm::{CompletionClient, CompletionRequest};

use crate::error::PipelineError;

/// The text produced for one action, ready to store or render.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutput {
    pub action: ActionKey,
    pub prompt: String,
    /// Completion text; already sanitized for `er_plantuml`.
    pub text: String,
    pub model: String,
    pub temperature: f64,
}

impl ActionOutput {
    /// SVG rendering link for diagram outputs, `None` for every other action.
    pub fn diagram_url(&self, server: &str) -> Option<String> {
        diagram_url(self.action, &self.text, server)
    }
}

/// SVG rendering link for stored `er_plantuml` text; `None` for other actions.
pub fn diagram_url(action: ActionKey, text: &str, server: &str) -> Option<String> {
    (action == ActionKey::ErPlantuml)
        .then(|| plantuml::image_url(server, DiagramFormat::Svg, &extract_plantuml_code(text)))
}

/// Build the prompt for `action`, send it, and post-process the answer.
///
/// Exactly one completion request is made. Only `er_plantuml` output is
/// rewritten, through [`sanitize_plantuml`].
pub async fn run_action(
    client: &dyn CompletionClient,
    ctx: &ProjectContext,
    action: ActionKey,
    temperature: f64,
) -> Result<ActionOutput, PipelineError> {
    let prompt = build_prompt(ctx, action);
    let request =
        CompletionRequest::new(SYSTEM_INSTRUCTIONS, prompt.as_str()).with_temperature(temperature);

    tracing::debug!(action = %action, prompt_len = prompt.len(), "Running action");
    let completion = client.complete(&request).await?;

    let text = match action {
        ActionKey::ErPlantuml => sanitize_plantuml(completion.text.as_str()),
        _ => completion.text,
    };

    Ok(ActionOutput {
        action,
        prompt,
        text,
        model: completion.model,
        temperature,
    })
}
