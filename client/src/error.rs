//! Error types for the entity store client.

use thiserror::Error;

/// Errors that can occur when talking to the entity store.
///
/// None of these retry automatically; a retry is a new operator-initiated
/// attempt.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Network-level failure before a response arrived.
    #[error("request failed: {0}")]
    Transport(String),

    /// The store answered with a non-success status. For writes the message
    /// is the raw response body, surfaced verbatim to the operator.
    #[error("entity store error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error payload from the store, unmodified.
        message: String,
    },

    /// A success response whose body could not be decoded.
    #[error("response parsing failed: {0}")]
    Parse(String),
}
