//! Difficulty targets expressed as leading zero hex digits.
//!
//! A hash meets difficulty `d` when its hex form starts with `d` zeros, which
//! is the same as its numeric value being below `16^(64 - d)`.

use crate::network::DIGEST_HEX_LEN;

/// Build the target prefix for a difficulty: `difficulty` `'0'` characters.
pub fn difficulty_target(difficulty: usize) -> String {
    "0".repeat(difficulty)
}

/// Check if a hex hash meets the difficulty.
#[inline]
pub fn hash_meets_difficulty(hash_hex: &str, difficulty: usize) -> bool {
    hash_hex.len() >= difficulty && hash_hex.as_bytes()[..difficulty].iter().all(|&b| b == b'0')
}

/// Check a raw SHA256 digest against the difficulty without hex-encoding it.
///
/// Each byte holds two hex digits, high nibble first.
#[inline]
pub fn digest_meets_difficulty(digest: &[u8; 32], difficulty: usize) -> bool {
    if difficulty > DIGEST_HEX_LEN {
        return false;
    }
    let full_bytes = difficulty / 2;
    if digest[..full_bytes].iter().any(|&b| b != 0) {
        return false;
    }
    difficulty % 2 == 0 || digest[full_bytes] < 0x10
}

/// Count leading zero hex digits.
pub fn leading_zero_digits(hash_hex: &str) -> usize {
    hash_hex.bytes().take_while(|&b| b == b'0').count()
}

/// Whether any SHA256 hash could ever satisfy this difficulty.
#[inline]
pub fn is_attainable(difficulty: usize) -> bool {
    difficulty <= DIGEST_HEX_LEN
}

/// Estimate average hashes needed to meet the difficulty.
pub fn expected_hashes(difficulty: usize) -> f64 {
    // Each leading hex digit is zero with probability 1/16
    16f64.powi(difficulty as i32)
}

/// Format a hash count for display (e.g., "1.23M").
pub fn format_hashes(hashes: f64) -> String {
    if hashes >= 1e15 {
        format!("{:.2}P", hashes / 1e15)
    } else if hashes >= 1e12 {
        format!("{:.2}T", hashes / 1e12)
    } else if hashes >= 1e9 {
        format!("{:.2}G", hashes / 1e9)
    } else if hashes >= 1e6 {
        format!("{:.2}M", hashes / 1e6)
    } else if hashes >= 1e3 {
        format!("{:.2}K", hashes / 1e3)
    } else {
        format!("{:.2}", hashes)
    }
}
