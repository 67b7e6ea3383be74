//! Encoder configuration.

use hella_core::{DEFAULT_MAX_DEPTH, OBJECT_POINTER_TAG};
use serde::{Deserialize, Serialize};

/// Default tag for field-combination pointers.
pub const COMBINATION_POINTER_TAG: u8 = 0xd;

/// Configuration for a [`RecordEncoder`](crate::RecordEncoder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Container nesting accepted when decoding.
    pub max_depth: usize,
    /// Tag for whole-record pointers.
    pub object_tag: u8,
    /// Tag for field-combination pointers.
    pub combination_tag: u8,
    /// Upper bound on fields per combination request (cost is `2^n`).
    pub max_combination_fields: usize,
    /// Field path holding the timestamp in the encoded object.
    pub timestamp_field: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            object_tag: OBJECT_POINTER_TAG,
            combination_tag: COMBINATION_POINTER_TAG,
            max_combination_fields: 16,
            timestamp_field: "/timestamp".to_string(),
        }
    }
}

impl EncoderConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Only the low four bits of `tag` are used.
    pub fn with_object_tag(mut self, tag: u8) -> Self {
        self.object_tag = tag & 0xf;
        self
    }

    /// Only the low four bits of `tag` are used.
    pub fn with_combination_tag(mut self, tag: u8) -> Self {
        self.combination_tag = tag & 0xf;
        self
    }

    pub fn with_max_combination_fields(mut self, max: usize) -> Self {
        self.max_combination_fields = max;
        self
    }

    pub fn with_timestamp_field(mut self, path: impl Into<String>) -> Self {
        self.timestamp_field = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EncoderConfig::default();
        assert_eq!(config.object_tag, 0xc);
        assert_eq!(config.combination_tag, 0xd);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.timestamp_field, "/timestamp");
    }

    #[test]
    fn test_builder_masks_tags() {
        let config = EncoderConfig::default()
            .with_object_tag(0x1a)
            .with_combination_tag(0x3);
        assert_eq!(config.object_tag, 0xa);
        assert_eq!(config.combination_tag, 0x3);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EncoderConfig =
            serde_json::from_str(r#"{"max_combination_fields": 4}"#).unwrap();
        assert_eq!(config.max_combination_fields, 4);
        assert_eq!(config.object_tag, 0xc);
        assert_eq!(config.timestamp_field, "/timestamp");
    }
}
