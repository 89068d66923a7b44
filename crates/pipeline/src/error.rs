use schemasmith_core::docx::DocxError;
use schemasmith_core::error::CoreError;
use schemasmith_llm::CompletionError;

/// Errors raised while generating or persisting outputs.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Document error: {0}")]
    Document(#[from] DocxError),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
}
