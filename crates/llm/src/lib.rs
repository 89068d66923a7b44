//! Chat-completion client for SchemaSmith.
//!
//! [`CompletionClient`] is the seam the pipeline talks to; [`OpenAiClient`]
//! implements it against any OpenAI-compatible `/chat/completions` endpoint.

pub mod client;
pub mod config;
pub mod error;
pub mod openai;

pub use client::{Completion, CompletionClient, CompletionRequest, DEFAULT_TEMPERATURE};
pub use config::LlmConfig;
pub use error::CompletionError;
pub use openai::OpenAiClient;
