//! # Hella
//!
//! Record encoding on top of [`hella_core`]: flat field records, whole-record
//! content pointers, and pointers for every combination of a chosen field
//! set (precomputed group-by keys).
//!
//! ## Usage
//!
//! ```rust
//! use hella::{Record, RecordEncoder};
//!
//! let encoder = RecordEncoder::default();
//! let record = Record::new(1_577_398_870_360_465_300)
//!     .with_field("/ticker", "MSFT")
//!     .with_field("/price", 97.61);
//!
//! let encoded = encoder.encode(&record).unwrap();
//! assert_eq!(encoder.decode(&encoded.bytes).unwrap(), record);
//!
//! let combos = encoder
//!     .combination_pointers(&record, &["/ticker", "/price"])
//!     .unwrap();
//! assert_eq!(combos.len(), 3);
//! ```
//!
//! ## Re-exports
//!
//! - `hella::core` - Codec, hashing and pointer primitives

pub mod config;
pub mod error;
pub mod json;
pub mod record;

pub use hella_core as core;

pub use config::{EncoderConfig, COMBINATION_POINTER_TAG};
pub use error::{HellaError, Result};
pub use record::{EncodedRecord, Record, RecordEncoder};

pub use hella_core::{CodecError, HardHash, Object, Pointer, Value, OBJECT_POINTER_TAG};
