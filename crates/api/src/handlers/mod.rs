pub mod file;
pub mod generation;
pub mod project;

use std::future::Future;

use schemasmith_pipeline::PipelineError;

use crate::error::{AppError, AppResult};

/// Run a pipeline job on its own task and wait for it.
///
/// The job keeps running when the request future is dropped (client
/// disconnect or the request timeout), so records it created still reach a
/// terminal status.
pub(crate) async fn run_detached<T, F>(job: F) -> AppResult<T>
where
    F: Future<Output = Result<T, PipelineError>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(job)
        .await
        .map_err(|e| AppError::InternalError(format!("Pipeline task failed: {e}")))?
        .map_err(AppError::from)
}
