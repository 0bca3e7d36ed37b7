//! Network definitions and shared constants.

use serde::{Deserialize, Serialize};

/// Network an address is derived for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Main network
    #[default]
    Mainnet,
    /// Test network
    Testnet,
}

impl Network {
    /// Get the version byte for pay-to-public-key-hash addresses.
    pub fn p2pkh_version(&self) -> u8 {
        match self {
            Network::Mainnet => 0x00,
            Network::Testnet => 0x6f,
        }
    }

    /// Parse network from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" => Some(Network::Mainnet),
            "testnet" | "test" => Some(Network::Testnet),
            _ => None,
        }
    }

    /// Get network name as string.
    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }
}

impl core::fmt::Display for Network {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Upper bound of the nonce space searched when the caller gives none.
pub const DEFAULT_MAX_NONCE: u64 = i32::MAX as u64;

/// Worker count used when hardware parallelism cannot be queried.
pub const FALLBACK_WORKERS: usize = 4;

/// Hashes a worker computes before publishing its tally.
pub const DEFAULT_REPORT_INTERVAL: u64 = 10_000;

/// Length of a SHA256 digest in hex characters.
pub const DIGEST_HEX_LEN: usize = 64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_bytes() {
        assert_eq!(Network::Mainnet.p2pkh_version(), 0x00);
        assert_eq!(Network::Testnet.p2pkh_version(), 0x6f);
        assert_eq!(Network::default(), Network::Mainnet);
    }

    #[test]
    fn test_network_from_str() {
        assert_eq!(Network::from_str("mainnet"), Some(Network::Mainnet));
        assert_eq!(Network::from_str("MAINNET"), Some(Network::Mainnet));
        assert_eq!(Network::from_str("testnet"), Some(Network::Testnet));
        assert_eq!(Network::from_str("invalid"), None);
    }

    #[test]
    fn test_network_serde_names() {
        assert_eq!(serde_json::to_string(&Network::Testnet).unwrap(), "\"testnet\"");
        let parsed: Network = serde_json::from_str("\"mainnet\"").unwrap();
        assert_eq!(parsed, Network::Mainnet);
    }
}
