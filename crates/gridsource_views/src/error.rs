//! Error types for the view store.

use thiserror::Error;

/// Result type for view-store operations.
pub type ViewStoreResult<T> = Result<T, ViewStoreError>;

/// Errors that can occur during view-store operations.
#[derive(Error, Debug)]
pub enum ViewStoreError {
    /// Network or transport error.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// No view with the given name is visible in the caller's scope.
    #[error("view not found: {0}")]
    NotFound(String),

    /// A view with the given name already exists in the caller's scope.
    #[error("a view named {0:?} already exists")]
    DuplicateName(String),

    /// The store reported a failure.
    #[error("store error: {0}")]
    StoreError(String),

    /// Not connected to the store.
    #[error("not connected to view store")]
    NotConnected,
}

impl ViewStoreError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            ViewStoreError::NotFound("Active".into()).to_string(),
            "view not found: Active"
        );
        assert_eq!(
            ViewStoreError::NotConnected.to_string(),
            "not connected to view store"
        );
        assert!(ViewStoreError::DuplicateName("Active".into())
            .to_string()
            .contains("\"Active\""));
    }
}
