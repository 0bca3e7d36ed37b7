//! Base58 and Base58Check encoding.
//!
//! Encoding only. Decoding is left to callers.

use crate::hash::double_sha256;

/// Bitcoin Base58 alphabet (no 0, O, I or l).
pub const BASE58_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Length of the Base58Check checksum in bytes.
pub const CHECKSUM_LEN: usize = 4;

/// Encode bytes as Base58.
///
/// The input is read as a big-endian base-256 number. Every leading zero
/// byte is emitted as a leading `'1'`.
pub fn base58_encode(input: &[u8]) -> String {
    let leading_zeros = input.iter().take_while(|&&b| b == 0).count();

    // Little-endian base-58 digits of the numeric part
    let mut digits: Vec<u8> = Vec::with_capacity((input.len() - leading_zeros) * 138 / 100 + 1);

    for &byte in &input[leading_zeros..] {
        // Multiply digits by 256 and add byte
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            let temp = (*digit as u32) * 256 + carry;
            *digit = (temp % 58) as u8;
            carry = temp / 58;
        }

        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut encoded = String::with_capacity(leading_zeros + digits.len());
    encoded.extend(core::iter::repeat('1').take(leading_zeros));
    encoded.extend(digits.iter().rev().map(|&d| BASE58_ALPHABET[d as usize] as char));
    encoded
}

/// Encode `version || payload || checksum` as Base58.
///
/// The checksum is the first four bytes of `double_sha256(version || payload)`.
pub fn base58check_encode(payload: &[u8], version: u8) -> String {
    let mut extended = Vec::with_capacity(1 + payload.len() + CHECKSUM_LEN);
    extended.push(version);
    extended.extend_from_slice(payload);

    let checksum = double_sha256(&extended);
    extended.extend_from_slice(&checksum[..CHECKSUM_LEN]);

    base58_encode(&extended)
}

/// Reference decoder used to check encoder output in tests.
#[cfg(test)]
pub(crate) fn base58_decode(input: &str) -> Option<Vec<u8>> {
    let leading_zeros = input.chars().take_while(|&c| c == '1').count();
    let mut result: Vec<u8> = Vec::new();

    for c in input.chars().skip(leading_zeros) {
        let value = BASE58_ALPHABET.iter().position(|&x| x == c as u8)? as u32;

        // Multiply result by 58 and add value
        let mut carry = value;
        for byte in result.iter_mut().rev() {
            let temp = (*byte as u32) * 58 + carry;
            *byte = (temp & 0xFF) as u8;
            carry = temp >> 8;
        }

        while carry > 0 {
            result.insert(0, (carry & 0xFF) as u8);
            carry >>= 8;
        }
    }

    let mut decoded = vec![0u8; leading_zeros];
    decoded.extend(result);
    Some(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_empty() {
        assert_eq!(base58_encode(&[]), "");
    }

    #[test]
    fn test_encode_known_vectors() {
        assert_eq!(base58_encode(b"hello world"), "StV1DL6CwTryKyV");
        assert_eq!(base58_encode(&[0x00, 0x00, 0x28, 0x7f, 0xb4, 0xcd]), "11233QC4");
        assert_eq!(base58_encode(&[0x61]), "2g");
    }

    #[test]
    fn test_leading_zero_bytes_become_ones() {
        let encoded = base58_encode(&[0x00, 0x01]);
        assert_eq!(encoded, "12");
        assert!(encoded.starts_with('1'));

        assert_eq!(base58_encode(&[0x00]), "1");
        assert_eq!(base58_encode(&[0x00, 0x00, 0x00]), "111");
    }

    #[test]
    fn test_exactly_one_one_per_zero_byte() {
        for zeros in 0..5 {
            let mut input = vec![0u8; zeros];
            input.extend_from_slice(&[0xff, 0x10]);
            let encoded = base58_encode(&input);
            let ones = encoded.chars().take_while(|&c| c == '1').count();
            assert_eq!(ones, zeros, "input with {} zero bytes", zeros);
        }
    }

    #[test]
    fn test_alphabet_excludes_ambiguous_chars() {
        for c in [b'0', b'O', b'I', b'l'] {
            assert!(!BASE58_ALPHABET.contains(&c));
        }
    }

    #[test]
    fn test_decode_inverts_encode() {
        let input = [0x00, 0x00, 0x01, 0x02, 0xfe, 0xff, 0x00];
        assert_eq!(base58_decode(&base58_encode(&input)).unwrap(), input.to_vec());
    }

    #[test]
    fn test_base58check_layout() {
        let payload = [0x11u8; 20];
        let encoded = base58check_encode(&payload, 0x6f);
        let decoded = base58_decode(&encoded).unwrap();

        assert_eq!(decoded.len(), 1 + 20 + CHECKSUM_LEN);
        assert_eq!(decoded[0], 0x6f);
        assert_eq!(&decoded[1..21], &payload[..]);

        let checksum = double_sha256(&decoded[..21]);
        assert_eq!(&decoded[21..], &checksum[..CHECKSUM_LEN]);
    }

    #[test]
    fn test_base58check_version_zero_keeps_leading_one() {
        let encoded = base58check_encode(&[0xab; 20], 0x00);
        assert!(encoded.starts_with('1'));
    }
}
