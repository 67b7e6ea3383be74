//! Error types for the record layer.

use hella_core::CodecError;
use thiserror::Error;

/// Errors that can occur while building, encoding or decoding records.
#[derive(Debug, Error)]
pub enum HellaError {
    /// Codec error.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// A record field holds an object; records are flat.
    #[error("field {0} holds a nested object")]
    NestedField(String),

    /// JSON input cannot be represented as a record.
    #[error("unsupported json: {0}")]
    UnsupportedJson(String),

    /// Too many fields for a combination request.
    #[error("combination over {count} fields exceeds the limit of {max}")]
    TooManyFields { count: usize, max: usize },

    /// A field required by the operation is missing or has the wrong type.
    #[error("unknown or invalid field: {0}")]
    UnknownField(String),

    /// A record field uses the path reserved for the timestamp.
    #[error("field {0} is reserved for the timestamp")]
    ReservedField(String),

    /// Bytes remain after the encoded record.
    #[error("{0} trailing bytes after record")]
    TrailingBytes(usize),
}

/// Result type for record operations.
pub type Result<T> = std::result::Result<T, HellaError>;
