//! Error types for the diff crate.

use std::fmt;

use whyrender_value::ValueKind;

/// Failure raised by a caller-supplied comparator.
pub type ComparatorError = Box<dyn std::error::Error + Send + Sync>;

/// Which of the two compared inputs an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Previous,
    Next,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Previous => f.write_str("previous"),
            Side::Next => f.write_str("next"),
        }
    }
}

/// Errors that abort a change detection.
#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    /// An input was not an object or array.
    #[error("{side} props must be a key-value map, got {kind}")]
    InvalidInput { side: Side, kind: ValueKind },

    /// The caller's comparator failed; the error is passed through as-is.
    #[error(transparent)]
    Comparator(ComparatorError),
}

impl DetectError {
    /// Recover the comparator's own error, if that is what failed.
    pub fn into_comparator_error(self) -> Option<ComparatorError> {
        match self {
            DetectError::Comparator(err) => Some(err),
            _ => None,
        }
    }
}

/// Convenience alias for detection results.
pub type DetectResult<T> = Result<T, DetectError>;
