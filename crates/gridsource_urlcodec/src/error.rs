//! Error types for the URL codec.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that strict decoding can report.
///
/// Query-string decoding itself is lenient and never fails; these errors
/// surface only through [`percent_decode_strict`](crate::percent_decode_strict),
/// for callers that want to reject malformed input instead of tolerating it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A `%` escape was truncated or not followed by two hex digits.
    #[error("invalid percent escape at byte {position}")]
    InvalidPercentEscape {
        /// Byte offset of the offending `%`.
        position: usize,
    },

    /// Decoded bytes were not valid UTF-8.
    #[error("decoded bytes are not valid UTF-8")]
    InvalidUtf8,
}
