//! Address derivation from public keys.
//!
//! `address = Base58Check(version, RIPEMD160(SHA256(pubkey)))`

use crate::base58::base58check_encode;
use crate::codec::from_hex;
use crate::error::Result;
use crate::hash::hash160;
use crate::network::Network;

/// Derive an address from a hex-encoded public key.
///
/// The key bytes are not checked for curve validity, only for being hex.
pub fn public_key_to_address(public_key_hex: &str, version: u8) -> Result<String> {
    let public_key = from_hex(public_key_hex)?;
    Ok(base58check_encode(&hash160(&public_key), version))
}

/// Derive a pay-to-public-key-hash address for `network`.
pub fn address_for_network(public_key_hex: &str, network: Network) -> Result<String> {
    public_key_to_address(public_key_hex, network.p2pkh_version())
}
