//! Error types for Hella Core.

use thiserror::Error;

/// Errors raised by the varint codec, the value codec and pointer derivation.
///
/// Decode-side variants carry the byte offset at which the condition was
/// detected. The codec never repairs or skips malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("truncated input at offset {offset}")]
    TruncatedInput { offset: usize },

    #[error("unknown tag 0x{tag:02x} at offset {offset}")]
    UnknownTag { tag: u8, offset: usize },

    #[error("invalid utf-8 in string payload at offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("duplicate object key {key:?} at offset {offset}")]
    DuplicateKey { key: String, offset: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("integer overflow at offset {offset}")]
    Overflow { offset: usize },

    #[error("nesting depth {depth} exceeded at offset {offset}")]
    DepthLimitExceeded { depth: usize, offset: usize },
}

impl CodecError {
    /// Byte offset at which the error was detected, if it came from decoding.
    pub fn offset(&self) -> Option<usize> {
        match self {
            CodecError::TruncatedInput { offset }
            | CodecError::UnknownTag { offset, .. }
            | CodecError::InvalidUtf8 { offset }
            | CodecError::DuplicateKey { offset, .. }
            | CodecError::Overflow { offset }
            | CodecError::DepthLimitExceeded { offset, .. } => Some(*offset),
            CodecError::InvalidInput(_) => None,
        }
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_reported() {
        assert_eq!(CodecError::TruncatedInput { offset: 7 }.offset(), Some(7));
        assert_eq!(
            CodecError::UnknownTag { tag: 0xff, offset: 3 }.offset(),
            Some(3)
        );
        assert_eq!(CodecError::InvalidInput("negative".into()).offset(), None);
    }

    #[test]
    fn test_display() {
        let err = CodecError::UnknownTag { tag: 0xc0, offset: 12 };
        assert_eq!(err.to_string(), "unknown tag 0xc0 at offset 12");
    }
}
