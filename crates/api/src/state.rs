use std::sync::Arc;

use schemasmith_llm::CompletionClient;
use schemasmith_pipeline::PipelineSettings;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: schemasmith_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Pipeline settings derived from `config` once at startup.
    pub pipeline: Arc<PipelineSettings>,
    /// Completion backend used by every generation request.
    pub completion: Arc<dyn CompletionClient>,
}

impl AppState {
    pub fn new(
        pool: schemasmith_db::DbPool,
        config: ServerConfig,
        completion: Arc<dyn CompletionClient>,
    ) -> Self {
        let pipeline = Arc::new(config.pipeline_settings());
        Self {
            pool,
            config: Arc::new(config),
            pipeline,
            completion,
        }
    }
}
