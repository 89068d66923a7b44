/// Errors from the completion client.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// Required configuration (e.g. the API key) is missing or invalid.
    #[error("Completion service is not configured: {0}")]
    Configuration(String),

    /// The service answered but the first choice carried no text.
    #[error("Completion service returned an empty response")]
    EmptyCompletion,

    /// The HTTP request itself failed (network, DNS, TLS, body decoding).
    #[error("Completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service returned a non-2xx status (bad key, quota, unknown model).
    #[error("Completion service error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}
