//! In-memory UTXO set with replay-protection nonces.
//!
//! Outputs are stored per transaction as a vector indexed by output index.
//! Spending clears a slot but keeps it, so indices of later outputs never
//! shift. All state sits behind one `RwLock`, making a `UtxoLedger` safe to
//! share between threads.

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::output::{OutputParseError, TransactionOutput};

/// Highest output index the ledger accepts.
pub const MAX_OUTPUT_INDEX: usize = 1 << 20;

/// One unspent output in row form, ready for a persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializedUtxo {
    pub tx_id: String,
    pub index: usize,
    /// `recipient|amount|script`
    pub record: String,
}

impl SerializedUtxo {
    pub fn new(tx_id: impl Into<String>, index: usize, record: impl Into<String>) -> Self {
        SerializedUtxo {
            tx_id: tx_id.into(),
            index,
            record: record.into(),
        }
    }

    fn parse(&self) -> core::result::Result<TransactionOutput, OutputParseError> {
        TransactionOutput::from_record(&self.record)
    }
}

/// A consumed `(address, nonce)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonceRecord {
    pub address: String,
    pub nonce: u64,
}

impl NonceRecord {
    pub fn new(address: impl Into<String>, nonce: u64) -> Self {
        NonceRecord {
            address: address.into(),
            nonce,
        }
    }
}

/// An unspent output together with its location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtxoEntry {
    pub tx_id: String,
    pub index: usize,
    pub output: TransactionOutput,
}

/// Full ledger contents for JSON export and import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub utxos: Vec<SerializedUtxo>,
    pub nonces: Vec<NonceRecord>,
}

impl LedgerSnapshot {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::MalformedInput(format!("snapshot encoding failed: {}", e)))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::MalformedInput(format!("invalid snapshot: {}", e)))
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    utxos: HashMap<String, Vec<Option<TransactionOutput>>>,
    nonces: HashMap<String, HashSet<u64>>,
}

impl LedgerState {
    fn insert(&mut self, tx_id: String, index: usize, output: TransactionOutput) {
        let slots = self.utxos.entry(tx_id).or_default();
        if slots.len() <= index {
            slots.resize(index + 1, None);
        }
        slots[index] = Some(output);
    }

    /// Unspent outputs in store iteration order.
    fn unspent(&self) -> impl Iterator<Item = (&String, usize, &TransactionOutput)> + '_ {
        self.utxos.iter().flat_map(|(tx_id, slots)| {
            slots
                .iter()
                .enumerate()
                .filter_map(move |(index, slot)| slot.as_ref().map(|output| (tx_id, index, output)))
        })
    }
}

/// Parse records, dropping (and logging) any that are malformed.
fn parse_records<I>(records: I) -> Vec<(String, usize, TransactionOutput)>
where
    I: IntoIterator<Item = SerializedUtxo>,
{
    records
        .into_iter()
        .filter_map(|record| {
            if record.index > MAX_OUTPUT_INDEX {
                warn!(tx_id = %record.tx_id, index = record.index, "output index out of range; skipping record");
                return None;
            }
            match record.parse() {
                Ok(output) => Some((record.tx_id, record.index, output)),
                Err(e) => {
                    warn!(tx_id = %record.tx_id, index = record.index, error = %e, "unparsable UTXO record; skipping");
                    None
                }
            }
        })
        .collect()
}

/// Thread-safe UTXO set plus per-address used nonces.
pub struct UtxoLedger {
    state: RwLock<LedgerState>,
}

impl UtxoLedger {
    /// Create a new empty ledger.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(LedgerState::default()),
        }
    }

    // A panic while holding the lock cannot leave a slot vector half-resized,
    // so a poisoned lock is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `output` at `(tx_id, index)`, overwriting whatever was there.
    ///
    /// Slots below `index` that did not exist yet are created empty.
    /// Returns `false` and stores nothing if `index` exceeds
    /// [`MAX_OUTPUT_INDEX`] or the output would not survive serialization.
    pub fn add_utxo(&self, tx_id: impl Into<String>, index: usize, output: TransactionOutput) -> bool {
        let tx_id = tx_id.into();
        if index > MAX_OUTPUT_INDEX {
            warn!(tx_id = %tx_id, index, "output index out of range; not added");
            return false;
        }
        if let Err(e) = output.validate() {
            warn!(tx_id = %tx_id, index, error = %e, "unserializable output; not added");
            return false;
        }
        self.write().insert(tx_id, index, output);
        true
    }

    /// Look up an unspent output.
    pub fn get_utxo(&self, tx_id: &str, index: usize) -> Option<TransactionOutput> {
        self.read()
            .utxos
            .get(tx_id)
            .and_then(|slots| slots.get(index))
            .and_then(|slot| slot.clone())
    }

    /// Mark an output as spent.
    ///
    /// Returns `false` for unknown transactions, out-of-range indices and
    /// outputs that were already spent.
    pub fn spend_utxo(&self, tx_id: &str, index: usize) -> bool {
        self.write()
            .utxos
            .get_mut(tx_id)
            .and_then(|slots| slots.get_mut(index))
            .and_then(Option::take)
            .is_some()
    }

    pub fn is_nonce_used(&self, address: &str, nonce: u64) -> bool {
        self.read()
            .nonces
            .get(address)
            .is_some_and(|used| used.contains(&nonce))
    }

    /// Record a nonce as used. Recording it twice is harmless.
    pub fn add_nonce(&self, address: impl Into<String>, nonce: u64) {
        self.write().nonces.entry(address.into()).or_default().insert(nonce);
    }

    /// Check and record a nonce in one step.
    ///
    /// Returns `true` if the nonce was fresh, `false` if it was a replay.
    pub fn use_nonce(&self, address: impl Into<String>, nonce: u64) -> bool {
        self.write().nonces.entry(address.into()).or_default().insert(nonce)
    }

    /// Number of unspent outputs.
    pub fn utxo_count(&self) -> usize {
        self.read().unspent().count()
    }

    /// Number of output slots, spent ones included.
    pub fn slot_count(&self) -> usize {
        self.read().utxos.values().map(Vec::len).sum()
    }

    /// Number of recorded `(address, nonce)` pairs.
    pub fn nonce_count(&self) -> usize {
        self.read().nonces.values().map(HashSet::len).sum()
    }

    /// All unspent outputs paying `address`.
    pub fn get_utxos_for_address(&self, address: &str) -> Vec<UtxoEntry> {
        self.read()
            .unspent()
            .filter(|(_, _, output)| output.recipient == address)
            .map(|(tx_id, index, output)| UtxoEntry {
                tx_id: tx_id.clone(),
                index,
                output: output.clone(),
            })
            .collect()
    }

    /// Every unspent output as a record row.
    pub fn serialize_utxo_set(&self) -> Vec<SerializedUtxo> {
        self.read()
            .unspent()
            .map(|(tx_id, index, output)| SerializedUtxo::new(tx_id.clone(), index, output.to_record()))
            .collect()
    }

    /// Replace all outputs with the given records.
    ///
    /// Used nonces are left untouched. Malformed records are skipped.
    /// Returns the number of records restored.
    pub fn deserialize_utxo_set<I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = SerializedUtxo>,
    {
        let parsed = parse_records(records);
        let restored = parsed.len();

        let mut state = self.write();
        state.utxos.clear();
        for (tx_id, index, output) in parsed {
            state.insert(tx_id, index, output);
        }

        debug!(restored, "UTXO set restored");
        restored
    }

    /// Every used nonce as a record row.
    pub fn serialize_nonces(&self) -> Vec<NonceRecord> {
        self.read()
            .nonces
            .iter()
            .flat_map(|(address, used)| used.iter().map(move |&nonce| NonceRecord::new(address.clone(), nonce)))
            .collect()
    }

    /// Replace all used nonces with the given records.
    pub fn deserialize_nonces<I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = NonceRecord>,
    {
        let mut state = self.write();
        state.nonces.clear();
        let mut restored = 0;
        for record in records {
            state.nonces.entry(record.address).or_default().insert(record.nonce);
            restored += 1;
        }

        debug!(restored, "nonces restored");
        restored
    }

    /// Add outputs without clearing existing ones.
    ///
    /// Malformed records are skipped individually. Returns the number added.
    pub fn batch_add_utxos<I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = SerializedUtxo>,
    {
        let parsed = parse_records(records);
        let added = parsed.len();

        let mut state = self.write();
        for (tx_id, index, output) in parsed {
            state.insert(tx_id, index, output);
        }
        added
    }

    /// Add used nonces without clearing existing ones.
    pub fn batch_add_nonces<I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = NonceRecord>,
    {
        let mut state = self.write();
        let mut added = 0;
        for record in records {
            state.nonces.entry(record.address).or_default().insert(record.nonce);
            added += 1;
        }
        added
    }

    /// A page of unspent outputs in store iteration order.
    ///
    /// The order is stable only while the ledger is not modified.
    pub fn get_serialized_utxo_batch(&self, offset: usize, limit: usize) -> Vec<SerializedUtxo> {
        self.read()
            .unspent()
            .skip(offset)
            .take(limit)
            .map(|(tx_id, index, output)| SerializedUtxo::new(tx_id.clone(), index, output.to_record()))
            .collect()
    }

    /// Export outputs and nonces together.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            utxos: self.serialize_utxo_set(),
            nonces: self.serialize_nonces(),
        }
    }

    /// Replace outputs and nonces with a snapshot's contents.
    pub fn restore(&self, snapshot: LedgerSnapshot) {
        self.deserialize_utxo_set(snapshot.utxos);
        self.deserialize_nonces(snapshot.nonces);
    }

    /// Drop all outputs and nonces.
    pub fn clear(&self) {
        let mut state = self.write();
        state.utxos.clear();
        state.nonces.clear();
    }
}

impl Default for UtxoLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for UtxoLedger {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.read();
        f.debug_struct("UtxoLedger")
            .field("transactions", &state.utxos.len())
            .field("addresses", &state.nonces.len())
            .finish()
    }
}
