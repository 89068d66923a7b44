use std::path::PathBuf;

use schemasmith_core::plantuml::DEFAULT_PLANTUML_SERVER;
use schemasmith_core::upload::MAX_UPLOAD_BYTES;
use schemasmith_llm::DEFAULT_TEMPERATURE;

/// Locations and knobs shared by every pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Directory generated `.docx` files are written to.
    pub output_dir: PathBuf,
    /// Directory uploaded inputs are stored in.
    pub upload_dir: PathBuf,
    /// PlantUML server base URL used for diagram links.
    pub plantuml_server: String,
    pub temperature: f64,
    /// Largest accepted upload, in bytes.
    pub max_upload_bytes: usize,
}

impl PipelineSettings {
    pub fn new(output_dir: impl Into<PathBuf>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            upload_dir: upload_dir.into(),
            plantuml_server: DEFAULT_PLANTUML_SERVER.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_upload_bytes: MAX_UPLOAD_BYTES,
        }
    }
}
