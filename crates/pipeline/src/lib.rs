//! Generation pipeline: prompt, completion, sanitizing, document assembly
//! and persistence of the results.
//!
//! [`action`] and [`batch`] are free of I/O apart from the completion call
//! and whatever [`OutcomeSink`] the caller supplies;
//! [`persist`] and [`upload`] write to the database and the filesystem.

pub mod action;
pub mod batch;
pub mod error;
pub mod persist;
pub mod settings;
pub mod upload;

pub use action::{diagram_url, run_action, ActionOutput};
pub use batch::{generate_all, ActionOutcome, BatchReport, OutcomeSink};
pub use error::PipelineError;
pub use persist::{execute_action, generate_for_project, ExecutedAction, GeneratedDocument};
pub use settings::PipelineSettings;
pub use upload::{complete_document, UploadedDocument};
