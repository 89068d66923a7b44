use async_trait::async_trait;

use crate::error::CompletionError;

/// Sampling temperature used when the caller does not choose one.
pub const DEFAULT_TEMPERATURE: f64 = 0.2;

/// One chat-completion call: a system instruction plus a single user prompt.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f64,
}

impl CompletionRequest {
    /// Build a request with the default temperature.
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Text produced by the service, already trimmed and known to be non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    /// Configured model name, recorded with every stored output.
    pub model: String,
}

/// A text-completion backend.
///
/// Implementations make exactly one request per call, with no retry.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Model identifier recorded alongside every output.
    fn model(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, CompletionError>;
}
