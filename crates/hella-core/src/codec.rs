//! Tagged binary encoding for [`Value`] trees.
//!
//! Every value starts with a tag byte:
//!
//! | Tag           | Kind              | Payload                                        |
//! |---------------|-------------------|------------------------------------------------|
//! | `0x00`        | null              | none                                           |
//! | `0x02`/`0x03` | false / true      | none                                           |
//! | `0x10`        | float             | 8 bytes, f64 little-endian                     |
//! | `0x18`/`0x1c` | integer (+ / -)   | varint magnitude                               |
//! | `0x80 \| len5` | string            | UTF-8 bytes                                    |
//! | `0xa0 \| len5` | bytes             | raw bytes                                      |
//! | `0x40 \| len4` | array, mixed      | tagged elements                                |
//! | `0x50 \| len4` | array, bools      | bitmap, LSB first                              |
//! | `0x60 \| len4` | array, floats     | f64 little-endian each                         |
//! | `0x70 \| len4` | array, integers   | sign bitmap, then varint magnitudes            |
//! | `0xf0 \| len4` | object            | (string key, tagged value) pairs               |
//!
//! The low bits of a sequence tag hold the length when it is below the
//! field maximum (31 or 15). Otherwise they hold the maximum and a varint
//! carrying `length - max` follows, so a length equal to the maximum costs
//! one continuation byte of zero.
//!
//! **This layout is FROZEN.** Pointers are derived from encoded bytes.

use crate::error::{CodecError, Result};
use crate::value::{Object, Value};
use crate::varint::{decode_varint, write_varint};

/// Default bound on container nesting accepted by [`decode`].
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Tag bytes and sequence families.
pub mod tags {
    pub const NULL: u8 = 0x00;
    pub const FALSE: u8 = 0x02;
    pub const TRUE: u8 = 0x03;
    pub const FLOAT: u8 = 0x10;
    pub const INTEGER: u8 = 0x18;
    pub const NEGATIVE_INTEGER: u8 = 0x1c;

    pub const STRING: u8 = 0x80;
    pub const BYTES: u8 = 0xa0;

    pub const ARRAY_MIXED: u8 = 0x40;
    pub const ARRAY_BOOL: u8 = 0x50;
    pub const ARRAY_FLOAT: u8 = 0x60;
    pub const ARRAY_INTEGER: u8 = 0x70;

    pub const OBJECT: u8 = 0xf0;

    /// Embedded length width for strings and bytes.
    pub const SHORT_LENGTH_BITS: u32 = 5;
    /// Embedded length width for arrays and objects.
    pub const NIBBLE_LENGTH_BITS: u32 = 4;
}

// ─────────────────────────────────────────────────────────────────────────────
// Encoding
// ─────────────────────────────────────────────────────────────────────────────

/// Encode a value to bytes.
pub fn encode(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_to(&mut buf, value);
    buf
}

/// Append the encoding of `value` to `buf`.
pub fn encode_to(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Null => buf.push(tags::NULL),
        Value::Bool(b) => buf.push(if *b { tags::TRUE } else { tags::FALSE }),
        Value::Float(f) => {
            buf.push(tags::FLOAT);
            buf.extend_from_slice(&f.to_le_bytes());
        }
        Value::Integer(i) => encode_integer(buf, *i),
        Value::String(s) => encode_string(buf, s),
        Value::Bytes(b) => {
            write_sequence_prefix(buf, tags::BYTES, tags::SHORT_LENGTH_BITS, b.len());
            buf.extend_from_slice(b);
        }
        Value::Array(arr) => encode_array(buf, arr),
        Value::Object(obj) => encode_object(buf, obj),
    }
}

fn encode_integer(buf: &mut Vec<u8>, i: i64) {
    buf.push(if i < 0 {
        tags::NEGATIVE_INTEGER
    } else {
        tags::INTEGER
    });
    write_varint(buf, i.unsigned_abs());
}

fn encode_string(buf: &mut Vec<u8>, s: &str) {
    write_sequence_prefix(buf, tags::STRING, tags::SHORT_LENGTH_BITS, s.len());
    buf.extend_from_slice(s.as_bytes());
}

/// Write a sequence header: `high_bits | len` when `len` fits below the
/// field maximum, else `high_bits | max` followed by varint `len - max`.
fn write_sequence_prefix(buf: &mut Vec<u8>, high_bits: u8, length_bits: u32, len: usize) {
    let max = (1usize << length_bits) - 1;
    if len < max {
        buf.push(high_bits | len as u8);
    } else {
        buf.push(high_bits | max as u8);
        write_varint(buf, (len - max) as u64);
    }
}

/// Storage strategy for an array, chosen from its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayPacking {
    Mixed,
    Bool,
    Float,
    Integer,
}

impl ArrayPacking {
    /// Packed strategies apply only to non-empty arrays whose elements are
    /// all bools, all floats, or all integers.
    pub fn select(arr: &[Value]) -> Self {
        let first = match arr.first() {
            Some(v) => v,
            None => return ArrayPacking::Mixed,
        };
        let candidate = match first {
            Value::Bool(_) => ArrayPacking::Bool,
            Value::Float(_) => ArrayPacking::Float,
            Value::Integer(_) => ArrayPacking::Integer,
            _ => return ArrayPacking::Mixed,
        };
        let homogeneous = arr.iter().all(|v| {
            matches!(
                (candidate, v),
                (ArrayPacking::Bool, Value::Bool(_))
                    | (ArrayPacking::Float, Value::Float(_))
                    | (ArrayPacking::Integer, Value::Integer(_))
            )
        });
        if homogeneous {
            candidate
        } else {
            ArrayPacking::Mixed
        }
    }

    fn tag(self) -> u8 {
        match self {
            ArrayPacking::Mixed => tags::ARRAY_MIXED,
            ArrayPacking::Bool => tags::ARRAY_BOOL,
            ArrayPacking::Float => tags::ARRAY_FLOAT,
            ArrayPacking::Integer => tags::ARRAY_INTEGER,
        }
    }
}

fn encode_array(buf: &mut Vec<u8>, arr: &[Value]) {
    let packing = ArrayPacking::select(arr);
    write_sequence_prefix(buf, packing.tag(), tags::NIBBLE_LENGTH_BITS, arr.len());

    match packing {
        ArrayPacking::Mixed => {
            for item in arr {
                encode_to(buf, item);
            }
        }
        ArrayPacking::Bool => {
            write_bitmap(buf, arr.iter().map(|v| matches!(v, Value::Bool(true))), arr.len());
        }
        ArrayPacking::Float => {
            for item in arr {
                if let Value::Float(f) = item {
                    buf.extend_from_slice(&f.to_le_bytes());
                }
            }
        }
        ArrayPacking::Integer => {
            let ints = || arr.iter().filter_map(Value::as_i64);
            write_bitmap(buf, ints().map(|i| i < 0), arr.len());
            for i in ints() {
                write_varint(buf, i.unsigned_abs());
            }
        }
    }
}

/// Pack `len` bits LSB-first into `ceil(len / 8)` bytes.
fn write_bitmap(buf: &mut Vec<u8>, bits: impl Iterator<Item = bool>, len: usize) {
    let start = buf.len();
    buf.resize(start + bitmap_len(len), 0);
    for (index, bit) in bits.enumerate() {
        if bit {
            buf[start + index / 8] |= 1 << (index % 8);
        }
    }
}

fn bitmap_len(len: usize) -> usize {
    len / 8 + usize::from(len % 8 != 0)
}

fn encode_object(buf: &mut Vec<u8>, obj: &Object) {
    write_sequence_prefix(buf, tags::OBJECT, tags::NIBBLE_LENGTH_BITS, obj.len());
    for (key, value) in obj {
        encode_string(buf, key);
        encode_to(buf, value);
    }
}

/// An object encoding split into its header and per-entry pieces.
///
/// `prefix` followed by every `key || value` in order equals
/// `encode(&Value::Object(obj))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectParts {
    pub prefix: Vec<u8>,
    /// `(encoded key, encoded value)` per entry, in insertion order.
    pub entries: Vec<(Vec<u8>, Vec<u8>)>,
}

impl ObjectParts {
    /// Each entry's key bytes concatenated with its value bytes.
    pub fn joined_entries(&self) -> Vec<Vec<u8>> {
        self.entries
            .iter()
            .map(|(k, v)| {
                let mut joined = Vec::with_capacity(k.len() + v.len());
                joined.extend_from_slice(k);
                joined.extend_from_slice(v);
                joined
            })
            .collect()
    }

    /// Reassemble the full object encoding.
    pub fn concat(&self) -> Vec<u8> {
        let mut buf = self.prefix.clone();
        for (k, v) in &self.entries {
            buf.extend_from_slice(k);
            buf.extend_from_slice(v);
        }
        buf
    }
}

/// Serialize an object header and each entry separately.
pub fn object_parts(obj: &Object) -> ObjectParts {
    let mut prefix = Vec::with_capacity(1);
    write_sequence_prefix(&mut prefix, tags::OBJECT, tags::NIBBLE_LENGTH_BITS, obj.len());

    let entries = obj
        .iter()
        .map(|(key, value)| {
            let mut key_buf = Vec::with_capacity(key.len() + 1);
            encode_string(&mut key_buf, key);
            (key_buf, encode(value))
        })
        .collect();

    ObjectParts { prefix, entries }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoding
// ─────────────────────────────────────────────────────────────────────────────

/// Decode one value starting at `offset`.
///
/// Returns the value and the offset just past it. Container nesting is
/// limited to [`DEFAULT_MAX_DEPTH`].
pub fn decode(buf: &[u8], offset: usize) -> Result<(Value, usize)> {
    decode_with_depth(buf, offset, DEFAULT_MAX_DEPTH)
}

/// Decode one value with an explicit container nesting bound.
pub fn decode_with_depth(buf: &[u8], offset: usize, max_depth: usize) -> Result<(Value, usize)> {
    Decoder { buf, max_depth }.value(offset, 0)
}

struct Decoder<'a> {
    buf: &'a [u8],
    max_depth: usize,
}

impl<'a> Decoder<'a> {
    fn byte(&self, pos: usize) -> Result<u8> {
        self.buf
            .get(pos)
            .copied()
            .ok_or(CodecError::TruncatedInput { offset: pos })
    }

    /// Borrow `len` bytes at `pos`.
    fn take(&self, pos: usize, len: usize) -> Result<&'a [u8]> {
        let truncated = CodecError::TruncatedInput {
            offset: self.buf.len().max(pos),
        };
        let end = pos.checked_add(len).ok_or_else(|| truncated.clone())?;
        self.buf.get(pos..end).ok_or(truncated)
    }

    fn remaining(&self, pos: usize) -> usize {
        self.buf.len().saturating_sub(pos)
    }

    fn value(&self, pos: usize, depth: usize) -> Result<(Value, usize)> {
        if depth > self.max_depth {
            return Err(CodecError::DepthLimitExceeded { depth, offset: pos });
        }

        let tag = self.byte(pos)?;
        match tag {
            tags::NULL => Ok((Value::Null, pos + 1)),
            tags::FALSE => Ok((Value::Bool(false), pos + 1)),
            tags::TRUE => Ok((Value::Bool(true), pos + 1)),
            tags::FLOAT => {
                let f = self.float(pos + 1)?;
                Ok((Value::Float(f), pos + 9))
            }
            tags::INTEGER | tags::NEGATIVE_INTEGER => {
                let (magnitude, next) = decode_varint(self.buf, pos + 1)?;
                let i = signed(tag == tags::NEGATIVE_INTEGER, magnitude, pos + 1)?;
                Ok((Value::Integer(i), next))
            }
            t if t & 0xe0 == tags::STRING => {
                let (s, next) = self.string(pos)?;
                Ok((Value::String(s), next))
            }
            t if t & 0xe0 == tags::BYTES => {
                let (len, start) = self.sequence_length(pos, tags::SHORT_LENGTH_BITS)?;
                let bytes = self.take(start, len)?;
                Ok((Value::Bytes(bytes.to_vec()), start + len))
            }
            t if (tags::ARRAY_MIXED..=0x7f).contains(&t) => self.array(pos, depth),
            t if t & 0xf0 == tags::OBJECT => self.object(pos, depth),
            _ => Err(CodecError::UnknownTag { tag, offset: pos }),
        }
    }

    fn float(&self, pos: usize) -> Result<f64> {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(self.take(pos, 8)?);
        Ok(f64::from_le_bytes(raw))
    }

    /// Read a sequence header at `pos`; returns the length and the payload
    /// offset.
    ///
    /// A header announcing a continuation with nothing after it is not a
    /// complete tag and is reported as `UnknownTag`.
    fn sequence_length(&self, pos: usize, length_bits: u32) -> Result<(usize, usize)> {
        let tag = self.byte(pos)?;
        let max = (1u8 << length_bits) - 1;
        let embedded = tag & max;
        if embedded < max {
            return Ok((usize::from(embedded), pos + 1));
        }

        if pos + 1 >= self.buf.len() {
            return Err(CodecError::UnknownTag { tag, offset: pos });
        }
        let (extra, next) = decode_varint(self.buf, pos + 1)?;
        let len = extra
            .checked_add(u64::from(max))
            .and_then(|n| usize::try_from(n).ok())
            .ok_or(CodecError::Overflow { offset: pos + 1 })?;
        Ok((len, next))
    }

    fn string(&self, pos: usize) -> Result<(String, usize)> {
        let (len, start) = self.sequence_length(pos, tags::SHORT_LENGTH_BITS)?;
        let raw = self.take(start, len)?;
        let s = std::str::from_utf8(raw).map_err(|_| CodecError::InvalidUtf8 { offset: start })?;
        Ok((s.to_owned(), start + len))
    }

    fn array(&self, pos: usize, depth: usize) -> Result<(Value, usize)> {
        let family = self.byte(pos)? & 0xf0;
        let (len, mut cursor) = self.sequence_length(pos, tags::NIBBLE_LENGTH_BITS)?;

        let items = match family {
            tags::ARRAY_BOOL => {
                let bits = self.bitmap(cursor, len)?;
                cursor += bitmap_len(len);
                bits.into_iter().map(Value::Bool).collect()
            }
            tags::ARRAY_FLOAT => {
                let byte_len = len
                    .checked_mul(8)
                    .ok_or(CodecError::Overflow { offset: pos })?;
                let raw = self.take(cursor, byte_len)?;
                cursor += byte_len;
                raw.chunks_exact(8)
                    .map(|chunk| {
                        let mut word = [0u8; 8];
                        word.copy_from_slice(chunk);
                        Value::Float(f64::from_le_bytes(word))
                    })
                    .collect()
            }
            tags::ARRAY_INTEGER => {
                let signs = self.bitmap(cursor, len)?;
                cursor += bitmap_len(len);
                let mut items = Vec::with_capacity(len.min(self.remaining(cursor)));
                for negative in signs {
                    let (magnitude, next) = decode_varint(self.buf, cursor)?;
                    items.push(Value::Integer(signed(negative, magnitude, cursor)?));
                    cursor = next;
                }
                items
            }
            _ => {
                let mut items = Vec::with_capacity(len.min(self.remaining(cursor)));
                for _ in 0..len {
                    let (item, next) = self.value(cursor, depth + 1)?;
                    items.push(item);
                    cursor = next;
                }
                items
            }
        };

        Ok((Value::Array(items), cursor))
    }

    fn bitmap(&self, pos: usize, len: usize) -> Result<Vec<bool>> {
        let raw = self.take(pos, bitmap_len(len))?;
        Ok((0..len)
            .map(|index| raw[index / 8] & (1 << (index % 8)) != 0)
            .collect())
    }

    fn object(&self, pos: usize, depth: usize) -> Result<(Value, usize)> {
        let (len, mut cursor) = self.sequence_length(pos, tags::NIBBLE_LENGTH_BITS)?;
        let mut obj = Object::with_capacity(len.min(self.remaining(cursor)));

        for _ in 0..len {
            let key_offset = cursor;
            let key_tag = self.byte(cursor)?;
            if key_tag & 0xe0 != tags::STRING {
                return Err(CodecError::UnknownTag {
                    tag: key_tag,
                    offset: cursor,
                });
            }
            let (key, next) = self.string(cursor)?;
            if obj.contains_key(&key) {
                return Err(CodecError::DuplicateKey {
                    key,
                    offset: key_offset,
                });
            }
            let (value, next) = self.value(next, depth + 1)?;
            obj.insert(key, value);
            cursor = next;
        }

        Ok((Value::Object(obj), cursor))
    }
}

/// Rebuild a signed integer from a sign flag and magnitude.
fn signed(negative: bool, magnitude: u64, offset: usize) -> Result<i64> {
    let value = if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    };
    value.ok_or(CodecError::Overflow { offset })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<f64>()
                .prop_filter("NaN never compares equal", |f| !f.is_nan())
                .prop_map(Value::Float),
            any::<i64>().prop_map(Value::Integer),
            ".{0,40}".prop_map(Value::String),
            prop::collection::vec(any::<u8>(), 0..40).prop_map(Value::Bytes),
        ]
    }

    fn value() -> impl Strategy<Value = Value> {
        scalar().prop_recursive(4, 64, 20, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..20).prop_map(Value::Array),
                prop::collection::vec(any::<bool>(), 1..40)
                    .prop_map(|v| Value::Array(v.into_iter().map(Value::Bool).collect())),
                prop::collection::vec(any::<i64>(), 1..40)
                    .prop_map(|v| Value::Array(v.into_iter().map(Value::Integer).collect())),
                prop::collection::vec("[a-z]{0,8}", 0..20)
                    .prop_flat_map(move |keys| {
                        let n = keys.len();
                        (Just(keys), prop::collection::vec(inner.clone(), n))
                    })
                    .prop_map(|(keys, values)| {
                        let mut obj = Object::new();
                        for (k, v) in keys.into_iter().zip(values) {
                            obj.insert(k, v);
                        }
                        Value::Object(obj)
                    }),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_roundtrip(v in value()) {
            let bytes = encode(&v);
            let (decoded, end) = decode(&bytes, 0).unwrap();
            prop_assert_eq!(decoded, v);
            prop_assert_eq!(end, bytes.len());
        }

        #[test]
        fn prop_homogeneous_arrays_packed(
            bools in prop::collection::vec(any::<bool>(), 1..50),
            ints in prop::collection::vec(any::<i64>(), 1..50),
            floats in prop::collection::vec(-1e9f64..1e9, 1..50),
        ) {
            let b = encode(&Value::Array(bools.into_iter().map(Value::Bool).collect()));
            prop_assert_eq!(b[0] & 0xf0, tags::ARRAY_BOOL);
            let i = encode(&Value::Array(ints.into_iter().map(Value::Integer).collect()));
            prop_assert_eq!(i[0] & 0xf0, tags::ARRAY_INTEGER);
            let f = encode(&Value::Array(floats.into_iter().map(Value::Float).collect()));
            prop_assert_eq!(f[0] & 0xf0, tags::ARRAY_FLOAT);
        }

        #[test]
        fn prop_decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
            let _ = decode(&bytes, 0);
        }
    }
}
