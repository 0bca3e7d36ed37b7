//! Proof-of-work search configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::network::{DEFAULT_REPORT_INTERVAL, FALLBACK_WORKERS};

/// How the winning nonce is chosen when several workers find one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The first worker to publish a solution wins and everyone stops.
    #[default]
    FirstFound,
    /// The smallest valid nonce in the whole range wins.
    ///
    /// Workers keep scanning until their next nonce exceeds the best
    /// solution published so far, so the result is reproducible.
    LowestNonce,
}

/// Settings for [`crate::pow::Miner`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    /// Number of worker threads. `None` uses the detected parallelism.
    pub workers: Option<usize>,
    /// Hashes a worker computes between updates of the shared counter.
    pub report_interval: u64,
    /// Winner selection policy.
    pub tie_break: TieBreak,
}

impl Default for MiningConfig {
    fn default() -> Self {
        MiningConfig {
            workers: None,
            report_interval: DEFAULT_REPORT_INTERVAL,
            tie_break: TieBreak::FirstFound,
        }
    }
}

impl MiningConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::MalformedInput(format!("invalid mining config: {}", e)))
    }

    /// Use a fixed number of workers.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Set the winner selection policy.
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Resolve the worker count, never returning zero.
    pub fn worker_count(&self) -> usize {
        match self.workers {
            Some(n) if n > 0 => n,
            _ => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(FALLBACK_WORKERS),
        }
    }

    /// Report interval, never zero.
    pub fn report_interval(&self) -> u64 {
        self.report_interval.max(1)
    }
}
