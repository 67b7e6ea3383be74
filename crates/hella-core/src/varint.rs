//! Unsigned LEB128 variable-length integers.
//!
//! Seven bits per byte, least-significant group first. The continuation bit
//! (0x80) is set on every byte except the last; zero is the single byte 0x00.

use crate::error::{CodecError, Result};

const CONTINUATION: u8 = 0x80;
const PAYLOAD_MASK: u8 = 0x7f;

/// Encode an unsigned integer.
pub fn encode_varint(value: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(10);
    write_varint(&mut buf, value);
    buf
}

/// Append the encoding of `value` to `buf`.
pub fn write_varint(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value as u8) & PAYLOAD_MASK;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            return;
        }
        buf.push(byte | CONTINUATION);
    }
}

/// Encode a signed integer that must be non-negative.
///
/// Fails with [`CodecError::InvalidInput`] on negative values.
pub fn encode_varint_signed(value: i64) -> Result<Vec<u8>> {
    let value = u64::try_from(value)
        .map_err(|_| CodecError::InvalidInput(format!("negative varint: {}", value)))?;
    Ok(encode_varint(value))
}

/// Decode a varint starting at `offset`.
///
/// Returns the value and the offset just past its final byte. Fails with
/// `TruncatedInput` if the buffer ends before a terminating byte, and with
/// `Overflow` if the accumulated value does not fit in 64 bits.
pub fn decode_varint(buf: &[u8], offset: usize) -> Result<(u64, usize)> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;
    let mut pos = offset;

    loop {
        let byte = *buf
            .get(pos)
            .ok_or(CodecError::TruncatedInput { offset: pos })?;
        let group = u64::from(byte & PAYLOAD_MASK);

        if shift >= 64 || (shift > 0 && group >> (64 - shift) != 0) {
            // Zero groups past bit 63 are padding; anything else overflows.
            if group != 0 {
                return Err(CodecError::Overflow { offset: pos });
            }
        } else {
            result |= group << shift;
        }

        pos += 1;
        if byte & CONTINUATION == 0 {
            return Ok((result, pos));
        }
        shift = shift.saturating_add(7);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(encode_varint(0), vec![0x00]);
        assert_eq!(decode_varint(&[0x00], 0).unwrap(), (0, 1));
    }

    #[test]
    fn test_known_vectors() {
        assert_eq!(encode_varint(1), vec![0x01]);
        assert_eq!(encode_varint(127), vec![0x7f]);
        assert_eq!(encode_varint(128), vec![0x80, 0x01]);
        assert_eq!(encode_varint(300), vec![0xac, 0x02]);
        assert_eq!(encode_varint(16384), vec![0x80, 0x80, 0x01]);
    }

    #[test]
    fn test_decode_300() {
        assert_eq!(decode_varint(&[0xac, 0x02], 0).unwrap(), (300, 2));
    }

    #[test]
    fn test_decode_at_offset() {
        let buf = [0xff, 0xff, 0xac, 0x02, 0x05];
        assert_eq!(decode_varint(&buf, 2).unwrap(), (300, 4));
        assert_eq!(decode_varint(&buf, 4).unwrap(), (5, 5));
    }

    #[test]
    fn test_max_u64() {
        let bytes = encode_varint(u64::MAX);
        assert_eq!(bytes.len(), 10);
        assert_eq!(bytes[9], 0x01);
        assert_eq!(decode_varint(&bytes, 0).unwrap(), (u64::MAX, 10));
    }

    #[test]
    fn test_truncated() {
        assert_eq!(
            decode_varint(&[0x80], 0),
            Err(CodecError::TruncatedInput { offset: 1 })
        );
        assert_eq!(
            decode_varint(&[], 0),
            Err(CodecError::TruncatedInput { offset: 0 })
        );
    }

    #[test]
    fn test_overflow() {
        // 2^64: ten bytes with a final group of 2
        let buf = [0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x02];
        assert_eq!(
            decode_varint(&buf, 0),
            Err(CodecError::Overflow { offset: 9 })
        );
    }

    #[test]
    fn test_redundant_zero_groups_accepted() {
        assert_eq!(decode_varint(&[0x81, 0x80, 0x00], 0).unwrap(), (1, 3));
    }

    #[test]
    fn test_signed_rejects_negative() {
        assert!(matches!(
            encode_varint_signed(-1),
            Err(CodecError::InvalidInput(_))
        ));
        assert_eq!(encode_varint_signed(300).unwrap(), vec![0xac, 0x02]);
    }
}
