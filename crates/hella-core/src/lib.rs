//! # Hella Core
//!
//! Pure primitives for Hella: a compact self-describing value codec and the
//! hash family used to derive content-addressed pointers from it.
//!
//! This crate contains no I/O and no global state. Every function is a pure
//! computation over caller-owned buffers and is safe to call from any thread.
//!
//! ## Key Types
//!
//! - [`Value`] - Tagged value tree (null, bool, float, integer, string, bytes, array, object)
//! - [`Pointer`] - 4-bit tag plus 60-bit content hash
//! - [`HardHash`] - SHA-256 digest read as a little-endian integer
//! - [`CodecError`] - Decode and precondition failures, with byte offsets
//!
//! ## Encoding
//!
//! See the [`codec`] module for the tag table and sequence-length rules.

pub mod codec;
pub mod error;
pub mod hash;
pub mod pointer;
pub mod value;
pub mod varint;

pub use codec::{
    decode, decode_with_depth, encode, encode_to, object_parts, ArrayPacking, ObjectParts,
    DEFAULT_MAX_DEPTH,
};
pub use error::{CodecError, Result};
pub use hash::{
    combine_unordered60, combine_unordered64, combo_unordered60, hard_hash256, soft_hash60,
    soft_hash64, Combination, ComboIter, HardHash,
};
pub use pointer::{decode_pointer, object_pointer, Pointer, OBJECT_POINTER_TAG};
pub use value::{Object, Value};
pub use varint::{decode_varint, encode_varint, encode_varint_signed, write_varint};
