//! Batch mining controller for the browser.
//!
//! Browsers give us no threads, so the page calls `mine_batch` repeatedly and
//! each call scans the next slice of the nonce range on the main thread.

use ledger_core::difficulty::{expected_hashes, format_hashes};
use ledger_core::network::DEFAULT_MAX_NONCE;
use ledger_core::{mine_range, pow::verify_nonce};
use wasm_bindgen::prelude::*;

use crate::console_log;
use crate::state::{JobInfo, MiningResultInfo, MiningStats};

/// A configured search: preimage, difficulty and nonce bound.
#[derive(Debug, Clone)]
struct MiningJob {
    preimage_base: String,
    difficulty: usize,
    max_nonce: u64,
}

/// Progress through one job's nonce range, one batch at a time.
#[derive(Debug, Default)]
struct BatchSearch {
    job: Option<MiningJob>,
    stats: MiningStats,
    /// Winning nonce and hash, once found.
    solution: Option<(u64, String)>,
}

impl BatchSearch {
    /// Replace the job and start over from nonce 0.
    fn build_job(&mut self, preimage_base: &str, difficulty: u32, max_nonce: Option<u32>) -> JobInfo {
        let job = MiningJob {
            preimage_base: preimage_base.to_string(),
            difficulty: difficulty as usize,
            max_nonce: max_nonce.map(u64::from).unwrap_or(DEFAULT_MAX_NONCE),
        };

        let expected = expected_hashes(job.difficulty);
        let info = JobInfo {
            difficulty,
            max_nonce: job.max_nonce,
            expected_hashes: expected,
            expected_display: format_hashes(expected),
        };

        self.job = Some(job);
        self.stats = MiningStats::new();
        self.solution = None;
        info
    }

    /// Scan the next `batch_size` nonces. `None` if no job was built.
    ///
    /// Once the job is solved or exhausted every call reports the final
    /// state without hashing.
    fn step(&mut self, batch_size: u32) -> Option<MiningResultInfo> {
        let job = self.job.as_ref()?;

        if self.solution.is_some() || self.stats.exhausted {
            return Some(MiningResultInfo {
                found: self.solution.is_some(),
                exhausted: self.stats.exhausted,
                nonce: self.solution.as_ref().map(|(nonce, _)| *nonce),
                hash: self.solution.as_ref().map(|(_, hash)| hash.clone()),
                hashes_computed: 0,
            });
        }

        let start = self.stats.current_nonce;
        let end = start.saturating_add(batch_size as u64).min(job.max_nonce);
        let result = mine_range(&job.preimage_base, job.difficulty, start, end);

        self.stats.total_hashes += result.hashes_attempted;
        self.stats.current_nonce = end;

        if let (Some(nonce), Some(hash)) = (result.nonce, result.hash.clone()) {
            self.stats.solved = true;
            self.stats.current_nonce = nonce + 1;
            self.solution = Some((nonce, hash));
        } else if end >= job.max_nonce {
            self.stats.exhausted = true;
        }

        Some(MiningResultInfo {
            found: result.is_found(),
            exhausted: self.stats.exhausted,
            nonce: result.nonce,
            hash: result.hash,
            hashes_computed: result.hashes_attempted,
        })
    }

    fn verify(&self, nonce: u64, hash: &str) -> bool {
        self.job
            .as_ref()
            .is_some_and(|job| verify_nonce(&job.preimage_base, job.difficulty, nonce, hash))
    }
}

/// The main mining controller.
#[wasm_bindgen]
pub struct Miner {
    search: BatchSearch,
    /// Start time of mining.
    start_time: f64,
    /// Whether mining is active.
    is_mining: bool,
}

#[wasm_bindgen]
impl Miner {
    /// Create a new miner instance.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Miner {
        Miner {
            search: BatchSearch::default(),
            start_time: 0.0,
            is_mining: false,
        }
    }

    /// Set up a new search.
    ///
    /// # Arguments
    /// * `preimage_base` - String the decimal nonce is appended to
    /// * `difficulty` - Required leading zero hex digits
    /// * `max_nonce` - Exclusive nonce bound (defaults to 2^31 - 1)
    #[wasm_bindgen]
    pub fn build_job(
        &mut self,
        preimage_base: &str,
        difficulty: u32,
        max_nonce: Option<u32>,
    ) -> Result<JsValue, JsValue> {
        self.search.build_job(preimage_base, difficulty, max_nonce).to_js()
    }

    /// Mine a batch of nonces.
    ///
    /// # Arguments
    /// * `batch_size` - Number of nonces to try in this batch
    #[wasm_bindgen]
    pub fn mine_batch(&mut self, batch_size: u32) -> Result<JsValue, JsValue> {
        let solved_before = self.search.solution.is_some();
        let result = self
            .search
            .step(batch_size)
            .ok_or_else(|| JsValue::from_str("No job built"))?;

        // Update elapsed time
        if self.start_time > 0.0 {
            let now = js_sys::Date::now();
            self.search.stats.elapsed_ms = now - self.start_time;
            self.search.stats.update_hash_rate();
        }

        if let (false, Some(nonce), Some(hash)) = (solved_before, result.nonce, result.hash.as_deref()) {
            console_log(&format!("Solution found: nonce {} hash {}", nonce, hash));
        }

        result.to_js()
    }

    /// Check a nonce against the current job.
    #[wasm_bindgen]
    pub fn verify(&self, nonce: u32, hash: &str) -> bool {
        self.search.verify(nonce as u64, hash)
    }

    /// Start mining.
    #[wasm_bindgen]
    pub fn start_mining(&mut self) {
        self.is_mining = true;
        self.start_time = js_sys::Date::now();
    }

    /// Stop mining.
    #[wasm_bindgen]
    pub fn stop_mining(&mut self) {
        self.is_mining = false;
    }

    /// Check if mining is active.
    #[wasm_bindgen(getter)]
    pub fn is_mining(&self) -> bool {
        self.is_mining
    }

    /// Get current mining statistics.
    #[wasm_bindgen]
    pub fn get_stats(&self) -> Result<JsValue, JsValue> {
        self.search.stats.to_js()
    }

    /// Get the formatted hash rate.
    #[wasm_bindgen]
    pub fn get_hash_rate_display(&self) -> String {
        self.search.stats.format_hash_rate()
    }

    /// The winning hash, if a solution was found.
    #[wasm_bindgen]
    pub fn solution_hash(&self) -> Option<String> {
        self.search.solution.as_ref().map(|(_, hash)| hash.clone())
    }

    /// Reset the miner for a new job.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.search = BatchSearch::default();
        self.start_time = 0.0;
        self.is_mining = false;
    }
}

impl Default for Miner {
    fn default() -> Self {
        Self::new()
    }
}
