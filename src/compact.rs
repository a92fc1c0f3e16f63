//! Nibble-prefixed variable-length integer encoding
//!
//! The low 4 bits of the first byte hold a length control value `L`. For
//! `L < W` (`W` being the byte width of the integer) the encoding is `L + 1`
//! little-endian bytes of `(value << 4) | L`. Values that need the full width
//! use the escape form `L == W`: `W` bytes of `(value << 4) | W` followed by
//! one byte carrying the 4 high bits that were shifted out.
//!
//! ```text
//! value          u64 bytes   u32 bytes
//! 0 ..= 15           1           1
//! 16 ..= 4095        2           2
//! < 2^28             4           4
//! < 2^36             5           5 (escape at 2^28)
//! < 2^60             8           -
//! >= 2^60            9           -
//! ```

use crate::error::{Error, Result};

/// Number of bits reserved for the length control value
pub const LEN_CONTROL_BITS: u32 = 4;

/// Mask extracting the length control value from the first byte
pub const LEN_CONTROL_MASK: u8 = 0x0F;

/// Maximum bytes needed for a compacted u32 (5 bytes)
pub const MAX_COMPACT_U32_SIZE: usize = 5;

/// Maximum bytes needed for a compacted u64 (9 bytes)
pub const MAX_COMPACT_U64_SIZE: usize = 9;

/// Scratch buffer large enough for any compacted integer
pub type CompactBuf = [u8; MAX_COMPACT_U64_SIZE];

/// Length control value for `value` stored in an integer of `width` bytes
#[inline]
fn control(value: u64, width: usize) -> usize {
    let mut len = 0;
    while len < width {
        let bits = 8 * (len as u32 + 1) - LEN_CONTROL_BITS;
        if value < 1u64 << bits {
            return len;
        }
        len += 1;
    }
    width
}

#[inline]
fn encode(value: u64, width: usize) -> (CompactBuf, usize) {
    let len = control(value, width);
    let head = (value << LEN_CONTROL_BITS) | len as u64;
    let mut out = [0u8; MAX_COMPACT_U64_SIZE];

    if len == width {
        out[..width].copy_from_slice(&head.to_le_bytes()[..width]);
        let shift = 8 * width as u32 - LEN_CONTROL_BITS;
        out[width] = ((value >> shift) as u8) & LEN_CONTROL_MASK;
        return (out, width + 1);
    }

    out[..=len].copy_from_slice(&head.to_le_bytes()[..=len]);
    (out, len + 1)
}

#[inline]
fn decode(buf: &[u8], width: usize) -> Result<(u64, usize)> {
    let first = *buf.first().ok_or(Error::UnexpectedEof)?;
    let len = (first & LEN_CONTROL_MASK) as usize;
    if len > width {
        return Err(Error::InvalidLengthControl);
    }

    let mut raw = [0u8; 8];
    if len == width {
        if buf.len() < width + 1 {
            return Err(Error::UnexpectedEof);
        }
        raw[..width].copy_from_slice(&buf[..width]);
        let low = u64::from_le_bytes(raw) >> LEN_CONTROL_BITS;
        let high = u64::from(buf[width] & LEN_CONTROL_MASK);
        let shift = 8 * width as u32 - LEN_CONTROL_BITS;
        return Ok((low | (high << shift), width + 1));
    }

    if buf.len() < len + 1 {
        return Err(Error::UnexpectedEof);
    }
    raw[..=len].copy_from_slice(&buf[..=len]);
    Ok((u64::from_le_bytes(raw) >> LEN_CONTROL_BITS, len + 1))
}

/// Encode a u32, returning the scratch buffer and the number of bytes used
#[inline]
pub fn encode_u32(value: u32) -> (CompactBuf, usize) {
    encode(u64::from(value), 4)
}

/// Decode a compacted u32 from the given buffer
///
/// Returns (value, bytes_consumed) or an error.
#[inline]
pub fn decode_u32(buf: &[u8]) -> Result<(u32, usize)> {
    let (value, used) = decode(buf, 4)?;
    Ok((value as u32, used))
}

/// Encode a u64, returning the scratch buffer and the number of bytes used
#[inline]
pub fn encode_u64(value: u64) -> (CompactBuf, usize) {
    encode(value, 8)
}

/// Decode a compacted u64 from the given buffer
///
/// Returns (value, bytes_consumed) or an error.
#[inline]
pub fn decode_u64(buf: &[u8]) -> Result<(u64, usize)> {
    decode(buf, 8)
}

/// Encoded size of a compacted u32
#[inline]
pub fn encoded_len_u32(value: u32) -> usize {
    let len = control(u64::from(value), 4);
    if len == 4 {
        MAX_COMPACT_U32_SIZE
    } else {
        len + 1
    }
}

/// Encoded size of a compacted u64
#[inline]
pub fn encoded_len_u64(value: u64) -> usize {
    let len = control(value, 8);
    if len == 8 {
        MAX_COMPACT_U64_SIZE
    } else {
        len + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u32_roundtrip() {
        let test_values = [0, 1, 15, 16, 4095, 4096, (1 << 28) - 1, 1 << 28, u32::MAX];

        for &val in &test_values {
            let (buf, encoded_len) = encode_u32(val);
            let (decoded_val, decoded_len) = decode_u32(&buf[..encoded_len]).unwrap();

            assert_eq!(val, decoded_val);
            assert_eq!(encoded_len, decoded_len);
            assert_eq!(encoded_len, encoded_len_u32(val));
        }
    }

    #[test]
    fn test_u64_roundtrip() {
        let test_values = [
            0,
            1,
            15,
            16,
            4095,
            1 << 32,
            (1 << 60) - 1,
            1 << 60,
            u32::MAX as u64,
            u64::MAX,
        ];

        for &val in &test_values {
            let (buf, encoded_len) = encode_u64(val);
            let (decoded_val, decoded_len) = decode_u64(&buf[..encoded_len]).unwrap();

            assert_eq!(val, decoded_val);
            assert_eq!(encoded_len, decoded_len);
            assert_eq!(encoded_len, encoded_len_u64(val));
        }
    }

    #[test]
    fn test_u64_buckets() {
        assert_eq!(encoded_len_u64(0), 1);
        assert_eq!(encoded_len_u64(15), 1);
        assert_eq!(encoded_len_u64(16), 2);
        assert_eq!(encoded_len_u64(1 << 32), 5);
        assert_eq!(encoded_len_u64((1 << 60) - 1), 8);
        assert_eq!(encoded_len_u64(1 << 60), 9);
        assert_eq!(encoded_len_u64(u64::MAX), 9);
    }

    #[test]
    fn test_u32_buckets() {
        assert_eq!(encoded_len_u32(0), 1);
        assert_eq!(encoded_len_u32(15), 1);
        assert_eq!(encoded_len_u32(16), 2);
        assert_eq!(encoded_len_u32((1 << 28) - 1), 4);
        assert_eq!(encoded_len_u32(1 << 28), 5);
        assert_eq!(encoded_len_u32(u32::MAX), 5);
    }

    #[test]
    fn test_known_bytes() {
        let (buf, len) = encode_u64(5);
        assert_eq!(&buf[..len], &[0x50]);

        let (buf, len) = encode_u64(0x123);
        assert_eq!(&buf[..len], &[0x31, 0x12]);

        // escape: low 28 bits shifted, control nibble 4, then the top nibble
        let (buf, len) = encode_u32(0xF000_0001);
        assert_eq!(&buf[..len], &[0x14, 0x00, 0x00, 0x00, 0x0F]);
    }

    #[test]
    fn test_invalid_length_control() {
        // control nibble 5 is wider than a u32
        assert_eq!(decode_u32(&[0x05, 0, 0, 0, 0, 0]), Err(Error::InvalidLengthControl));
        assert_eq!(decode_u64(&[0x09; 10]), Err(Error::InvalidLengthControl));
    }

    #[test]
    fn test_unexpected_eof() {
        assert_eq!(decode_u64(&[]), Err(Error::UnexpectedEof));
        // control nibble says 3 more bytes, only 1 present
        assert_eq!(decode_u64(&[0x03, 0x00]), Err(Error::UnexpectedEof));
        // escape form missing the trailing high nibble byte
        let (buf, len) = encode_u64(u64::MAX);
        assert_eq!(decode_u64(&buf[..len - 1]), Err(Error::UnexpectedEof));
    }
}
