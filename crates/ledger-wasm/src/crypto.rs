//! Hashing and encoding functions exposed to JavaScript.
//!
//! String inputs are hashed as their UTF-8 bytes.

use wasm_bindgen::prelude::*;

use crate::js_error;

/// SHA256 of a string, as hex.
#[wasm_bindgen]
pub fn sha256(input: &str) -> String {
    ledger_core::hash::sha256_hex(input.as_bytes())
}

/// Double SHA256 of a string, as hex.
#[wasm_bindgen]
pub fn double_sha256(input: &str) -> String {
    ledger_core::hash::double_sha256_hex(input.as_bytes())
}

/// RIPEMD160 of a string, as hex.
#[wasm_bindgen]
pub fn ripemd160(input: &str) -> String {
    ledger_core::hash::ripemd160_hex(input.as_bytes())
}

/// Base58-encode raw bytes.
#[wasm_bindgen]
pub fn base58_encode(data: &[u8]) -> String {
    ledger_core::base58_encode(data)
}

/// Base58Check-encode raw bytes under a version byte.
#[wasm_bindgen]
pub fn base58check_encode(payload: &[u8], version: u8) -> String {
    ledger_core::base58check_encode(payload, version)
}

/// Derive an address from a hex public key (version defaults to 0).
#[wasm_bindgen]
pub fn public_key_to_address(public_key_hex: &str, version: Option<u8>) -> Result<String, JsValue> {
    ledger_core::public_key_to_address(public_key_hex, version.unwrap_or(0))
        .map_err(|e| js_error("Invalid public key", e))
}

/// Merkle root of an array of transaction id strings.
#[wasm_bindgen]
pub fn merkle_root(tx_ids: JsValue) -> Result<String, JsValue> {
    let ids: Vec<String> = serde_wasm_bindgen::from_value(tx_ids)
        .map_err(|e| js_error("Expected an array of strings", e))?;
    Ok(ledger_core::merkle_root(&ids))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_hashes() {
        assert_eq!(
            sha256("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(ripemd160("abc"), "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc");
        assert_eq!(
            double_sha256("hello"),
            "9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50"
        );
    }

    #[test]
    fn test_base58() {
        assert_eq!(base58_encode(b"hello world"), "StV1DL6CwTryKyV");
        assert_eq!(base58_encode(&[0, 0, 0x28, 0x7f, 0xb4, 0xcd]), "11233QC4");
        assert!(base58check_encode(&[0u8; 20], 0).starts_with('1'));
    }

    #[test]
    fn test_address_default_version() {
        let key = "0250863ad64a87ae8a2fe83c1af1a8403cb53f53e486d8511dad8a04887e5b2352";
        let address = public_key_to_address(key, None).unwrap();
        assert_eq!(address, "1PMycacnJaSqwwJqjawXBErnLsZ7RkXUAs");
        assert_eq!(public_key_to_address(key, Some(0)).unwrap(), address);
    }
}
