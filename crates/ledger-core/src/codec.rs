//! Hex conversion with strict decoding.

use crate::error::{Error, Result};

/// Encode bytes as lowercase hex, two digits per byte.
#[inline]
pub fn to_hex(data: &[u8]) -> String {
    hex::encode(data)
}

/// Decode a hex string.
///
/// Odd-length input and non-hex characters are rejected with
/// [`Error::MalformedInput`]; nothing is ever zero-filled.
pub fn from_hex(input: &str) -> Result<Vec<u8>> {
    hex::decode(input).map_err(|e| Error::MalformedInput(format!("invalid hex: {}", e)))
}
