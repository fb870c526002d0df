use thiserror::Error;

/// Errors produced when a value has no strict JSON form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    #[error("converting circular structure to JSON")]
    Circular,

    #[error("function {0} is not serializable")]
    Function(String),

    #[error("undefined has no JSON representation")]
    Undefined,

    #[error("serialization error: {0}")]
    Json(String),
}

/// Errors produced while building values from JSON documents.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("unknown shared value: {0}")]
    UnknownShared(String),

    #[error("invalid {marker} marker: {reason}")]
    InvalidMarker {
        marker: &'static str,
        reason: String,
    },
}
