//! Primitive layer for the ledger prototype.
//!
//! This crate provides pure Rust implementations of:
//! - SHA256, RIPEMD160 and double-SHA256 digests
//! - Hex and Base58/Base58Check encoding
//! - Address derivation from public keys
//! - Merkle roots over transaction id strings
//! - Multi-threaded proof-of-work nonce search
//! - An in-memory UTXO set with replay-protection nonces and record
//!   serialization for an external persistence layer

pub mod address;
pub mod base58;
pub mod codec;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod hash;
pub mod ledger;
pub mod merkle;
pub mod network;
pub mod output;
pub mod pow;

pub use address::{address_for_network, public_key_to_address};
pub use base58::{base58_encode, base58check_encode};
pub use codec::{from_hex, to_hex};
pub use config::{MiningConfig, TieBreak};
pub use error::{Error, Result};
pub use hash::{double_sha256, hash160, ripemd160, sha256, sha256_hex};
pub use ledger::{LedgerSnapshot, NonceRecord, SerializedUtxo, UtxoEntry, UtxoLedger};
pub use merkle::{merkle_root, EMPTY_MERKLE_ROOT};
pub use network::Network;
pub use output::{OutputParseError, TransactionOutput};
pub use pow::{mine_block, mine_range, CancelToken, Miner, MiningResult};
