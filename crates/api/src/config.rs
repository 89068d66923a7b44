use std::path::PathBuf;

use schemasmith_core::plantuml::DEFAULT_PLANTUML_SERVER;
use schemasmith_core::upload::MAX_UPLOAD_BYTES;
use schemasmith_pipeline::PipelineSettings;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// Completion service settings live in [`schemasmith_llm::LlmConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `600`). A full generation
    /// makes seven sequential completion calls.
    pub request_timeout_secs: u64,
    /// Directory generated documents are written to (default: `outputs`).
    pub output_dir: PathBuf,
    /// Directory uploads are stored in (default: `uploads`).
    pub upload_dir: PathBuf,
    /// PlantUML server used for diagram links.
    pub plantuml_server: String,
    /// Largest accepted upload in bytes (default: 20 MiB).
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                              |
    /// |------------------------|--------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                            |
    /// | `PORT`                 | `3000`                               |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`              |
    /// | `REQUEST_TIMEOUT_SECS` | `600`                                |
    /// | `OUTPUT_DIR`           | `outputs`                            |
    /// | `UPLOAD_DIR`           | `uploads`                            |
    /// | `PLANTUML_SERVER`      | `https://www.plantuml.com/plantuml`  |
    /// | `MAX_UPLOAD_BYTES`     | `20971520`                           |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "600".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let output_dir = std::env::var("OUTPUT_DIR")
            .unwrap_or_else(|_| "outputs".into())
            .into();

        let upload_dir = std::env::var("UPLOAD_DIR")
            .unwrap_or_else(|_| "uploads".into())
            .into();

        let plantuml_server =
            std::env::var("PLANTUML_SERVER").unwrap_or_else(|_| DEFAULT_PLANTUML_SERVER.into());

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .map(|v| v.parse().expect("MAX_UPLOAD_BYTES must be a valid usize"))
            .unwrap_or(MAX_UPLOAD_BYTES);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            output_dir,
            upload_dir,
            plantuml_server,
            max_upload_bytes,
        }
    }

    /// Pipeline settings derived from this configuration.
    pub fn pipeline_settings(&self) -> PipelineSettings {
        let mut settings = PipelineSettings::new(&self.output_dir, &self.upload_dir);
        settings.plantuml_server = self.plantuml_server.clone();
        settings.max_upload_bytes = self.max_upload_bytes;
        settings
    }
}
