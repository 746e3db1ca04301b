//! Error types for the external text-generation endpoint.

use thiserror::Error;

/// Errors that can occur when calling the text-generation endpoint.
///
/// Every call is single-attempt: the engine never retries, it either
/// substitutes fallback content (NPC messages, document feedback) or
/// surfaces the error to the setup surface (connection probe).
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Network-level failure (DNS, connect, timeout, TLS)
    #[error("transport error: {0}")]
    Transport(String),

    /// Endpoint answered with a non-2xx status
    #[error("endpoint returned HTTP {code}: {body}")]
    Status {
        /// HTTP status code
        code: u16,
        /// Raw response body, for the setup surface
        body: String,
    },

    /// Response body did not contain text at the expected field path
    #[error("malformed response body: {0}")]
    MalformedResponse(String),
}

impl GeneratorError {
    /// Creates a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}
