//! SHA256, RIPEMD160 and composite digests.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Single SHA256 hash.
#[inline]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let hash = Sha256::digest(data);
    let mut result = [0u8; 32];
    result.copy_from_slice(&hash);
    result
}

/// Double SHA256: SHA256(SHA256(data)).
///
/// Used for Base58Check checksums.
#[inline]
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut result = [0u8; 32];
    result.copy_from_slice(&second);
    result
}

/// Single RIPEMD160 hash.
#[inline]
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    let hash = Ripemd160::digest(data);
    let mut result = [0u8; 20];
    result.copy_from_slice(&hash);
    result
}

/// RIPEMD160(SHA256(data)), the public key hash inside an address.
#[inline]
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}

/// SHA256 rendered as 64 lowercase hex characters.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Double SHA256 rendered as lowercase hex.
pub fn double_sha256_hex(data: &[u8]) -> String {
    hex::encode(double_sha256(data))
}

/// RIPEMD160 rendered as 40 lowercase hex characters.
pub fn ripemd160_hex(data: &[u8]) -> String {
    hex::encode(ripemd160(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_empty() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha256_abc() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_hex_is_64_chars() {
        let inputs: [&[u8]; 4] = [b"", b"a", b"hello world", &[0u8; 1000]];
        for input in inputs {
            let digest = sha256_hex(input);
            assert_eq!(digest.len(), 64);
            assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_double_sha256() {
        // Known result for double SHA256 of "hello"
        let expected = hex::decode(
            "9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50"
        ).unwrap();
        assert_eq!(double_sha256(b"hello").as_slice(), expected.as_slice());
    }

    #[test]
    fn test_double_sha256_matches_two_single_passes() {
        let data = b"ledger";
        assert_eq!(double_sha256(data), sha256(&sha256(data)));
        assert_eq!(double_sha256_hex(data), hex::encode(sha256(&sha256(data))));
    }

    #[test]
    fn test_ripemd160_empty() {
        assert_eq!(ripemd160_hex(b""), "9c1185a5c5e9fc54612808977ee8f548b2258d31");
    }

    #[test]
    fn test_ripemd160_abc() {
        assert_eq!(ripemd160_hex(b"abc"), "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc");
    }

    #[test]
    fn test_hash160_composes() {
        let data = b"public key";
        assert_eq!(hash160(data), ripemd160(&sha256(data)));
    }
}
