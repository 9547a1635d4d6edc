//! LEB128-style variable-length integers: 7 data bits per byte, high bit set
//! on every byte except the last.

use super::error::{DawgError, Result};

const CONTINUATION: u8 = 0x80;
const PAYLOAD: u8 = 0x7F;
const SIGN: u8 = 0x40;

/// Appends the unsigned varint encoding of `value` to `out`.
pub fn encode_unsigned(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let byte = value as u8 & PAYLOAD;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | CONTINUATION);
    }
}

/// Decodes an unsigned varint starting at `start`.
///
/// Returns the value and the index of the first byte after it.
pub fn decode_unsigned(bytes: &[u8], start: usize) -> Result<(u64, usize)> {
    let mut value = 0u64;
    let mut shift = 0u32;
    let mut index = start;
    loop {
        let byte = *bytes
            .get(index)
            .ok_or_else(|| DawgError::corrupt(index, "truncated varint"))?;
        if shift >= 64 {
            return Err(DawgError::corrupt(start, "varint overflow"));
        }
        value |= u64::from(byte & PAYLOAD) << shift;
        index += 1;
        if byte & CONTINUATION == 0 {
            return Ok((value, index));
        }
        shift += 7;
    }
}

/// Appends the signed (two's complement) varint encoding of `value` to `out`.
///
/// Bytes are emitted until the remaining high bits all equal the sign bit of
/// the last 7-bit group.
pub fn encode_signed(mut value: i64, out: &mut Vec<u8>) {
    loop {
        let byte = value as u8 & PAYLOAD;
        value >>= 7;
        let done = (value == 0 && byte & SIGN == 0) || (value == -1 && byte & SIGN != 0);
        if done {
            out.push(byte);
            return;
        }
        out.push(byte | CONTINUATION);
    }
}

/// Decodes a signed varint starting at `start`.
///
/// Returns the value and the index of the first byte after it.
pub fn decode_signed(bytes: &[u8], start: usize) -> Result<(i64, usize)> {
    let mut value = 0i64;
    let mut shift = 0u32;
    let mut index = start;
    loop {
        let byte = *bytes
            .get(index)
            .ok_or_else(|| DawgError::corrupt(index, "truncated varint"))?;
        if shift >= 64 {
            return Err(DawgError::corrupt(start, "varint overflow"));
        }
        value |= i64::from(byte & PAYLOAD) << shift;
        shift += 7;
        index += 1;
        if byte & CONTINUATION == 0 {
            if shift < 64 && byte & SIGN != 0 {
                value |= -1i64 << shift;
            }
            return Ok((value, index));
        }
    }
}
