//! Content-addressed pointers.
//!
//! A pointer is a 64-bit value: a 4-bit category tag in the top nibble and a
//! 60-bit soft hash below it. Pointers are serialized big-endian so that raw
//! byte order matches numeric order.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::codec::object_parts;
use crate::error::{CodecError, Result};
use crate::hash::{combine_unordered60, MASK_60};
use crate::value::{Object, Value};

/// Tag used for whole-object pointers.
pub const OBJECT_POINTER_TAG: u8 = 0xc;

/// A tagged 64-bit content hash.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pointer(pub u64);

impl Pointer {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The 4-bit category tag.
    pub const fn tag(&self) -> u8 {
        (self.0 >> 60) as u8
    }

    /// The 60-bit content hash with the tag cleared.
    pub const fn hash(&self) -> u64 {
        self.0 & MASK_60
    }

    /// Big-endian bytes.
    pub const fn to_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    pub const fn from_bytes(bytes: [u8; 8]) -> Self {
        Self(u64::from_be_bytes(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Parse from a 16-character hex string.
    pub fn from_hex(s: &str) -> std::result::Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 8] = bytes
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Self::from_bytes(arr))
    }
}

impl fmt::Debug for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pointer({:x}:{:015x})", self.tag(), self.hash())
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<u64> for Pointer {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<Pointer> for u64 {
    fn from(p: Pointer) -> Self {
        p.0
    }
}

/// Derive the 8-byte big-endian pointer of a flat object.
///
/// Each entry is serialized as `key || value` and the collection is combined
/// with [`combine_unordered60`], so field order does not affect the result.
/// Fails with [`CodecError::InvalidInput`] if any value is itself an object.
pub fn object_pointer(obj: &Object, tag: u8) -> Result<[u8; 8]> {
    if let Some((key, _)) = obj.iter().find(|(_, v)| matches!(v, Value::Object(_))) {
        return Err(CodecError::InvalidInput(format!(
            "nested object at key {:?} cannot be part of a pointer",
            key
        )));
    }

    let parts = object_parts(obj);
    let hash = combine_unordered60(parts.joined_entries(), tag);
    Ok(hash.to_be_bytes())
}

/// Read an 8-byte big-endian pointer at `offset`.
///
/// With `mask_tag` set, the top four tag bits are cleared from the result.
pub fn decode_pointer(buf: &[u8], offset: usize, mask_tag: bool) -> Result<(u64, usize)> {
    let end = offset
        .checked_add(8)
        .filter(|&end| end <= buf.len())
        .ok_or(CodecError::TruncatedInput {
            offset: buf.len().max(offset),
        })?;

    let mut raw = [0u8; 8];
    raw.copy_from_slice(&buf[offset..end]);
    let mut value = u64::from_be_bytes(raw);
    if mask_tag {
        value &= MASK_60;
    }
    Ok((value, end))
}
