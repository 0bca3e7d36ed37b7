//! Serializable state handed back to JavaScript.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Convert any serializable value to a JS value.
pub(crate) fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {:?}", e)))
}

/// Mining statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MiningStats {
    /// Total hashes computed.
    pub total_hashes: u64,
    /// Current hash rate (hashes per second).
    pub hash_rate: f64,
    /// Whether a solution was found.
    pub solved: bool,
    /// Whether the nonce range ran out without a solution.
    pub exhausted: bool,
    /// Next nonce to try.
    pub current_nonce: u64,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: f64,
}

impl MiningStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update hash rate based on elapsed time.
    pub fn update_hash_rate(&mut self) {
        if self.elapsed_ms > 0.0 {
            self.hash_rate = (self.total_hashes as f64) / (self.elapsed_ms / 1000.0);
        }
    }

    /// Format hash rate for display.
    pub fn format_hash_rate(&self) -> String {
        format!("{}H/s", ledger_core::difficulty::format_hashes(self.hash_rate))
    }

    /// Convert to JS value.
    pub fn to_js(&self) -> Result<JsValue, JsValue> {
        to_js(self)
    }
}

/// Mining job information for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInfo {
    /// Required leading zero hex digits.
    pub difficulty: u32,
    /// Exclusive upper bound of the nonce range.
    pub max_nonce: u64,
    /// Average hashes needed to find a solution.
    pub expected_hashes: f64,
    /// Formatted expected hashes.
    pub expected_display: String,
}

impl JobInfo {
    /// Convert to JS value.
    pub fn to_js(&self) -> Result<JsValue, JsValue> {
        to_js(self)
    }
}

/// Result of one mining batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiningResultInfo {
    /// Whether a solution was found.
    pub found: bool,
    /// Whether the nonce range is used up.
    pub exhausted: bool,
    /// The winning nonce (if found).
    pub nonce: Option<u64>,
    /// The winning hash (if found).
    pub hash: Option<String>,
    /// Hashes computed in this batch.
    pub hashes_computed: u64,
}

impl MiningResultInfo {
    /// Convert to JS value.
    pub fn to_js(&self) -> Result<JsValue, JsValue> {
        to_js(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_hash_rate() {
        let mut stats = MiningStats::new();
        stats.total_hashes = 5_000;
        stats.elapsed_ms = 2_000.0;
        stats.update_hash_rate();
        assert_eq!(stats.hash_rate, 2_500.0);
        assert_eq!(stats.format_hash_rate(), "2.50KH/s");
    }

    #[test]
    fn test_hash_rate_needs_elapsed_time() {
        let mut stats = MiningStats::new();
        stats.total_hashes = 10;
        stats.update_hash_rate();
        assert_eq!(stats.hash_rate, 0.0);
        assert_eq!(stats.format_hash_rate(), "0.00H/s");
    }
}
