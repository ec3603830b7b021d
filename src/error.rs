//! Errors raised synchronously, before anything gets wrapped.

use thiserror::Error;

/// An error raised while preparing a conversion.
///
/// Failures of the wrapped targets are never reported through this type: they
/// surface as [`Rejection`](crate::deferred::Rejection)s of the returned
/// promises.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A function was given something it cannot work with.
    #[error("{0}")]
    InvalidArgument(String),
    /// A custom naming convention pattern failed to compile.
    #[error("invalid naming convention pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl Error {
    pub(crate) fn expected_function(kind: &str) -> Self {
        Error::InvalidArgument(format!(
            "Expected target function. Received {}",
            kind
        ))
    }

    pub(crate) fn expected_targets(kind: &str) -> Self {
        Error::InvalidArgument(format!(
            "Expected a plain object as targets. Received {}",
            kind
        ))
    }

    pub(crate) fn expected_list(kind: &str) -> Self {
        Error::InvalidArgument(format!(
            "Expected list as an array. Received {}",
            kind
        ))
    }

    pub(crate) fn expected_names() -> Self {
        Error::InvalidArgument(String::from(
            "Each element in the list should be a string.",
        ))
    }

    /// Tests whether this error was caused by an invalid argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}
