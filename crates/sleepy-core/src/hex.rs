//! Hex text decoding for statically provisioned credentials.
//!
//! Each pair of characters becomes one byte. Digits are looked up
//! independently and are case-insensitive.

use alloc::vec::Vec;

use crate::error::DecodeError;

/// Value of a single hex digit, or `None` for any other byte.
pub const fn hex_digit_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Decode a hex string into bytes.
///
/// The output is exactly half as long as the input. Fails with
/// [`DecodeError::OddLength`] before producing any output, or with
/// [`DecodeError::InvalidHexDigit`] naming the first offending pair.
pub fn decode(hex: &str) -> Result<Vec<u8>, DecodeError> {
    let src = hex.as_bytes();
    if src.len() % 2 != 0 {
        return Err(DecodeError::OddLength { len: src.len() });
    }

    let mut out = Vec::with_capacity(src.len() / 2);
    for (pair, chunk) in src.chunks_exact(2).enumerate() {
        out.push(decode_pair(pair, chunk[0], chunk[1])?);
    }
    Ok(out)
}

/// Decode a hex string into `out`, returning the number of bytes written.
///
/// `out` must hold at least `hex.len() / 2` bytes; the caller checks this.
pub(crate) fn decode_into(hex: &str, out: &mut [u8]) -> Result<usize, DecodeError> {
    let src = hex.as_bytes();
    if src.len() % 2 != 0 {
        return Err(DecodeError::OddLength { len: src.len() });
    }
    debug_assert!(out.len() >= src.len() / 2);

    for (pair, (chunk, slot)) in src.chunks_exact(2).zip(out.iter_mut()).enumerate() {
        *slot = decode_pair(pair, chunk[0], chunk[1])?;
    }
    Ok(src.len() / 2)
}

fn decode_pair(pair: usize, hi: u8, lo: u8) -> Result<u8, DecodeError> {
    let Some(hi_val) = hex_digit_value(hi) else {
        return Err(DecodeError::InvalidHexDigit { pair, byte: hi });
    };
    let Some(lo_val) = hex_digit_value(lo) else {
        return Err(DecodeError::InvalidHexDigit { pair, byte: lo });
    };
    Ok((hi_val << 4) | lo_val)
}
