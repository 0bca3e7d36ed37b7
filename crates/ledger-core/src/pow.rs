//! Parallel proof-of-work nonce search.
//!
//! The nonce space `[0, max_nonce)` is split into one contiguous chunk per
//! worker. Workers share three things only: a cancellation token, a single
//! atomic winner cell and an atomic hash counter.

use core::fmt::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{MiningConfig, TieBreak};
use crate::difficulty::{digest_meets_difficulty, hash_meets_difficulty, is_attainable};
use crate::hash::{sha256, sha256_hex};

/// Winner cell value meaning "no solution yet".
const NO_WINNER: u64 = u64::MAX;

/// Nonces above this cannot be reported through
/// [`MiningResult::nonce_or_sentinel`], so searches stop here.
pub const MAX_SEARCH_NONCE: u64 = i64::MAX as u64;

/// Cooperative cancellation flag shared with every worker.
///
/// Workers check it once per nonce, so a cancel takes effect after at most
/// one more hash per worker.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask all workers to stop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Result of a nonce search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiningResult {
    /// The nonce that produced the hash (if found).
    pub nonce: Option<u64>,
    /// The resulting hash in hex (if found).
    pub hash: Option<String>,
    /// Number of hashes computed across all workers.
    pub hashes_attempted: u64,
}

impl MiningResult {
    /// Create a result indicating no match found.
    pub fn not_found(hashes: u64) -> Self {
        MiningResult {
            nonce: None,
            hash: None,
            hashes_attempted: hashes,
        }
    }

    /// Create a result indicating a solution was found.
    pub fn found(nonce: u64, hash: String, hashes: u64) -> Self {
        MiningResult {
            nonce: Some(nonce),
            hash: Some(hash),
            hashes_attempted: hashes,
        }
    }

    pub fn is_found(&self) -> bool {
        self.nonce.is_some()
    }

    /// The nonce, or `-1` when no solution was found.
    pub fn nonce_or_sentinel(&self) -> i64 {
        self.nonce.and_then(|n| i64::try_from(n).ok()).unwrap_or(-1)
    }

    /// The hash, or an empty string when no solution was found.
    pub fn hash_or_empty(&self) -> &str {
        self.hash.as_deref().unwrap_or("")
    }
}

/// The string that gets hashed for `nonce`: the preimage followed by the
/// nonce in decimal.
pub fn candidate(preimage_base: &str, nonce: u64) -> String {
    format!("{}{}", preimage_base, nonce)
}

/// Hash of the candidate for `nonce`, in hex.
pub fn candidate_hash(preimage_base: &str, nonce: u64) -> String {
    sha256_hex(candidate(preimage_base, nonce).as_bytes())
}

/// Check a reported `(nonce, hash)` pair.
pub fn verify_nonce(preimage_base: &str, difficulty: usize, nonce: u64, hash: &str) -> bool {
    let computed = candidate_hash(preimage_base, nonce);
    computed == hash && hash_meets_difficulty(&computed, difficulty)
}

/// State shared by the workers of one search.
struct SharedSearch<'a> {
    cancel: &'a CancelToken,
    winner: AtomicU64,
    hashes: AtomicU64,
    tie_break: TieBreak,
}

impl<'a> SharedSearch<'a> {
    fn new(cancel: &'a CancelToken, tie_break: TieBreak) -> Self {
        SharedSearch {
            cancel,
            winner: AtomicU64::new(NO_WINNER),
            hashes: AtomicU64::new(0),
            tie_break,
        }
    }

    #[inline]
    fn should_stop(&self, nonce: u64) -> bool {
        if self.cancel.is_cancelled() {
            return true;
        }
        let winner = self.winner.load(Ordering::Acquire);
        match self.tie_break {
            TieBreak::FirstFound => winner != NO_WINNER,
            TieBreak::LowestNonce => nonce >= winner,
        }
    }

    fn publish(&self, nonce: u64) {
        match self.tie_break {
            TieBreak::FirstFound => {
                // Losing the exchange means another worker already won
                let _ = self
                    .winner
                    .compare_exchange(NO_WINNER, nonce, Ordering::AcqRel, Ordering::Acquire);
            }
            TieBreak::LowestNonce => {
                self.winner.fetch_min(nonce, Ordering::AcqRel);
            }
        }
    }

    fn winner(&self) -> Option<u64> {
        match self.winner.load(Ordering::Acquire) {
            NO_WINNER => None,
            nonce => Some(nonce),
        }
    }

    fn hashes(&self) -> u64 {
        self.hashes.load(Ordering::Acquire)
    }
}

/// Scan `[start, end)` ascending until a solution is published, the range is
/// exhausted or the search is stopped.
fn search_chunk(
    preimage_base: &str,
    difficulty: usize,
    start: u64,
    end: u64,
    shared: &SharedSearch<'_>,
    report_interval: u64,
) {
    let mut buffer = String::with_capacity(preimage_base.len() + 20);
    buffer.push_str(preimage_base);
    let mut local_hashes = 0u64;

    for nonce in start..end {
        if shared.should_stop(nonce) {
            break;
        }

        buffer.truncate(preimage_base.len());
        // Writing into a String cannot fail
        let _ = write!(buffer, "{}", nonce);

        let digest = sha256(buffer.as_bytes());
        local_hashes += 1;

        if digest_meets_difficulty(&digest, difficulty) {
            shared.publish(nonce);
            break;
        }

        if local_hashes == report_interval {
            shared.hashes.fetch_add(local_hashes, Ordering::AcqRel);
            local_hashes = 0;
        }
    }

    shared.hashes.fetch_add(local_hashes, Ordering::AcqRel);
}

/// Single-threaded scan of `[start, end)`, returning the first solution.
///
/// This is the body each worker of [`Miner`] runs, exposed for hosts that
/// drive the search in batches themselves.
pub fn mine_range(preimage_base: &str, difficulty: usize, start: u64, end: u64) -> MiningResult {
    if !is_attainable(difficulty) {
        return MiningResult::not_found(0);
    }

    let end = end.min(MAX_SEARCH_NONCE);
    let cancel = CancelToken::new();
    let shared = SharedSearch::new(&cancel, TieBreak::FirstFound);
    search_chunk(preimage_base, difficulty, start, end, &shared, u64::MAX);

    match shared.winner() {
        Some(nonce) => MiningResult::found(nonce, candidate_hash(preimage_base, nonce), shared.hashes()),
        None => MiningResult::not_found(shared.hashes()),
    }
}

/// Search `[0, max_nonce)` with the default configuration.
pub fn mine_block(preimage_base: &str, difficulty: usize, max_nonce: u64) -> MiningResult {
    Miner::default().mine_block(preimage_base, difficulty, max_nonce)
}

/// Multi-threaded proof-of-work searcher.
#[derive(Debug, Clone, Default)]
pub struct Miner {
    config: MiningConfig,
}

impl Miner {
    pub fn new(config: MiningConfig) -> Self {
        Miner { config }
    }

    pub fn config(&self) -> &MiningConfig {
        &self.config
    }

    /// Find a nonce such that `sha256(preimage_base + nonce)` starts with
    /// `difficulty` zero hex digits.
    ///
    /// Blocks until every worker has stopped.
    pub fn mine_block(&self, preimage_base: &str, difficulty: usize, max_nonce: u64) -> MiningResult {
        self.mine_block_with_cancel(preimage_base, difficulty, max_nonce, &CancelToken::new())
    }

    /// Like [`Miner::mine_block`], but stops early once `cancel` fires.
    pub fn mine_block_with_cancel(
        &self,
        preimage_base: &str,
        difficulty: usize,
        max_nonce: u64,
        cancel: &CancelToken,
    ) -> MiningResult {
        if !is_attainable(difficulty) {
            warn!(difficulty, "difficulty exceeds digest length; no nonce can match");
            return MiningResult::not_found(0);
        }
        if max_nonce == 0 {
            return MiningResult::not_found(0);
        }
        let max_nonce = max_nonce.min(MAX_SEARCH_NONCE);

        let workers = (self.config.worker_count() as u64).min(max_nonce);
        let chunk_size = max_nonce / workers;
        let report_interval = self.config.report_interval();
        let shared = SharedSearch::new(cancel, self.config.tie_break);

        debug!(workers, chunk_size, difficulty, max_nonce, "starting nonce search");

        std::thread::scope(|scope| {
            for i in 0..workers {
                let start = i * chunk_size;
                // Last chunk absorbs the remainder
                let end = if i == workers - 1 { max_nonce } else { (i + 1) * chunk_size };
                let shared = &shared;
                scope.spawn(move || {
                    search_chunk(preimage_base, difficulty, start, end, shared, report_interval)
                });
            }
        });

        let hashes = shared.hashes();
        match shared.winner() {
            Some(nonce) => {
                let hash = candidate_hash(preimage_base, nonce);
                info!(nonce, hashes, hash = %hash, "nonce found");
                MiningResult::found(nonce, hash, hashes)
            }
            None => {
                debug!(hashes, cancelled = cancel.is_cancelled(), "nonce search ended without a solution");
                MiningResult::not_found(hashes)
            }
        }
    }
}
