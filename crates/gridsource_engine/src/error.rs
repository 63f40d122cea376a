//! Error types for the data-source engine.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while resolving a query state.
///
/// Cancellation is deliberately not represented here: a superseded or
/// aborted resolution is discarded silently and never reaches the engine's
/// error overlay.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Network or transport failure reported by the fetch collaborator.
    #[error("transport error: {message}")]
    Transport {
        /// Description from the fetch collaborator.
        message: String,
    },

    /// The response body did not match the expected page shape.
    #[error("invalid response: {message}")]
    InvalidResponse {
        /// Description of the shape mismatch.
        message: String,
    },

    /// The configured transform hook rejected the payload.
    #[error("transform failed: {message}")]
    Transform {
        /// Description from the transform hook.
        message: String,
    },
}

impl EngineError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates an invalid-response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Creates a transform error.
    pub fn transform(message: impl Into<String>) -> Self {
        Self::Transform {
            message: message.into(),
        }
    }
}
