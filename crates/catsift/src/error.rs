//! Error types for the catsift crate.

use thiserror::Error;

/// Errors that can surface from resolving a request.
///
/// The classifier and compiler absorb malformed input wherever a sane
/// default exists (unknown attributes, bad operator tokens, undecodable
/// cursors); only the two cases below become request-level errors.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A filter literal is incompatible with the attribute's kind.
    #[error("type mismatch on '{attribute}': expected {expected}, got {actual}")]
    TypeMismatch {
        attribute: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// The row source failed after the configured number of attempts.
    #[error("row source failed after {attempts} attempt(s): {message}")]
    Source { attempts: u32, message: String },
}

/// Result type for catsift operations.
pub type Result<T> = std::result::Result<T, FilterError>;
