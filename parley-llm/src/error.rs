//! Worker-side error types.

use thiserror::Error;

/// Errors that can end a generation or status worker.
///
/// All of these stay inside the worker that produced them: the dispatch
/// bridge converts every variant into "no queue item produced".
#[derive(Debug, Error)]
pub enum GenError {
    /// Connection refused, DNS failure, or any other transport error.
    #[error("generation request failed: {0}")]
    Network(String),

    /// The hard per-call timeout elapsed.
    #[error("generation request timed out")]
    Timeout,

    /// The endpoint answered with a non-success status.
    #[error("generation endpoint returned HTTP {0}")]
    Status(u16),

    /// HTTP 200 but the body did not match `{results:[{text}]}`.
    #[error("unexpected generation response shape: {0}")]
    MalformedResponse(String),

    /// The service returned only whitespace.
    #[error("generation produced an empty completion")]
    EmptyCompletion,
}

impl From<reqwest::Error> for GenError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GenError::Timeout
        } else {
            GenError::Network(err.to_string())
        }
    }
}
