//! UTXO ledger exposed to JavaScript.

use ledger_core::{LedgerSnapshot, NonceRecord, SerializedUtxo, TransactionOutput, UtxoLedger};
use wasm_bindgen::prelude::*;

use crate::js_error;
use crate::state::to_js;

/// Browser-side handle to a [`UtxoLedger`].
#[wasm_bindgen]
#[derive(Default)]
pub struct Ledger {
    inner: UtxoLedger,
}

#[wasm_bindgen]
impl Ledger {
    /// Create an empty ledger.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Ledger {
        Ledger::default()
    }

    /// Store an output. Returns `false` if the index is out of range or the
    /// output could not be exported and imported again.
    #[wasm_bindgen]
    pub fn add_utxo(&self, tx_id: &str, index: usize, recipient: &str, amount: f64, script: &str) -> bool {
        match TransactionOutput::try_new(recipient, amount, script) {
            Ok(output) => self.inner.add_utxo(tx_id, index, output),
            Err(_) => false,
        }
    }

    /// The output at `(tx_id, index)`, or `undefined` when absent or spent.
    #[wasm_bindgen]
    pub fn get_utxo(&self, tx_id: &str, index: usize) -> Result<JsValue, JsValue> {
        match self.inner.get_utxo(tx_id, index) {
            Some(output) => to_js(&output),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    #[wasm_bindgen]
    pub fn spend_utxo(&self, tx_id: &str, index: usize) -> bool {
        self.inner.spend_utxo(tx_id, index)
    }

    #[wasm_bindgen]
    pub fn is_nonce_used(&self, address: &str, nonce: u64) -> bool {
        self.inner.is_nonce_used(address, nonce)
    }

    #[wasm_bindgen]
    pub fn add_nonce(&self, address: &str, nonce: u64) {
        self.inner.add_nonce(address, nonce);
    }

    /// Record a nonce, returning `false` if it was already used.
    #[wasm_bindgen]
    pub fn use_nonce(&self, address: &str, nonce: u64) -> bool {
        self.inner.use_nonce(address, nonce)
    }

    #[wasm_bindgen]
    pub fn utxo_count(&self) -> usize {
        self.inner.utxo_count()
    }

    /// Output slots including spent placeholders.
    #[wasm_bindgen]
    pub fn slot_count(&self) -> usize {
        self.inner.slot_count()
    }

    #[wasm_bindgen]
    pub fn nonce_count(&self) -> usize {
        self.inner.nonce_count()
    }

    #[wasm_bindgen]
    pub fn get_utxos_for_address(&self, address: &str) -> Result<JsValue, JsValue> {
        to_js(&self.inner.get_utxos_for_address(address))
    }

    /// One page of `{ tx_id, index, record }` rows.
    #[wasm_bindgen]
    pub fn get_serialized_utxo_batch(&self, offset: usize, limit: usize) -> Result<JsValue, JsValue> {
        to_js(&self.inner.get_serialized_utxo_batch(offset, limit))
    }

    /// Load `{ tx_id, index, record }` rows without clearing.
    #[wasm_bindgen]
    pub fn batch_add_utxos(&self, rows: JsValue) -> Result<usize, JsValue> {
        let rows: Vec<SerializedUtxo> =
            serde_wasm_bindgen::from_value(rows).map_err(|e| js_error("Invalid UTXO rows", e))?;
        Ok(self.inner.batch_add_utxos(rows))
    }

    /// Load `{ address, nonce }` rows without clearing.
    #[wasm_bindgen]
    pub fn batch_add_nonces(&self, rows: JsValue) -> Result<usize, JsValue> {
        let rows: Vec<NonceRecord> =
            serde_wasm_bindgen::from_value(rows).map_err(|e| js_error("Invalid nonce rows", e))?;
        Ok(self.inner.batch_add_nonces(rows))
    }

    /// Export the whole ledger as JSON.
    #[wasm_bindgen]
    pub fn export_snapshot(&self) -> Result<String, JsValue> {
        self.inner
            .snapshot()
            .to_json()
            .map_err(|e| js_error("Snapshot export failed", e))
    }

    /// Replace the ledger with a JSON snapshot.
    #[wasm_bindgen]
    pub fn import_snapshot(&self, json: &str) -> Result<(), JsValue> {
        let snapshot = LedgerSnapshot::from_json(json).map_err(|e| js_error("Snapshot import failed", e))?;
        self.inner.restore(snapshot);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn clear(&self) {
        self.inner.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_spend_and_counts() {
        let ledger = Ledger::new();
        assert!(ledger.add_utxo("tx", 2, "alice", 5.0, "lock"));
        assert_eq!(ledger.utxo_count(), 1);
        assert_eq!(ledger.slot_count(), 3);

        assert!(ledger.spend_utxo("tx", 2));
        assert!(!ledger.spend_utxo("tx", 2));
        assert_eq!(ledger.utxo_count(), 0);
        assert_eq!(ledger.slot_count(), 3);

        assert!(ledger.use_nonce("alice", 1));
        assert!(!ledger.use_nonce("alice", 1));
        ledger.add_nonce("bob", 4);
        assert_eq!(ledger.nonce_count(), 2);
        assert!(ledger.is_nonce_used("bob", 4));
    }

    #[test]
    fn test_add_rejects_what_export_would_lose() {
        let ledger = Ledger::new();
        assert!(!ledger.add_utxo("tx", 0, "a|b", 1.0, "s"));
        assert!(!ledger.add_utxo("tx", 0, "alice", f64::NAN, "s"));
        assert!(!ledger.add_utxo("tx", 0, "alice", 1.0, "two\nlines"));
        assert!(!ledger.add_utxo("tx", usize::MAX, "alice", 1.0, "s"));
        assert_eq!(ledger.slot_count(), 0);
    }

    #[test]
    fn test_snapshot_export_import() {
        let ledger = Ledger::new();
        ledger.add_utxo("tx1", 0, "alice", 1234567.0, "a|b");
        ledger.add_utxo("tx1", 1, "bob", 0.5, "");
        ledger.add_nonce("alice", 9);

        let json = ledger.export_snapshot().unwrap();
        let restored = Ledger::new();
        restored.add_utxo("stale", 0, "old", 1.0, "s");
        restored.import_snapshot(&json).unwrap();

        assert_eq!(restored.utxo_count(), 2);
        assert_eq!(restored.nonce_count(), 1);
        assert!(restored.is_nonce_used("alice", 9));
        assert!(!restored.spend_utxo("stale", 0));
        assert!(restored.spend_utxo("tx1", 0));

        restored.clear();
        assert_eq!(restored.utxo_count(), 0);
        assert_eq!(restored.nonce_count(), 0);
    }
}
