//! Error types shared by the codec and address layers.

/// Errors surfaced by fallible primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Input could not be decoded (bad hex, wrong length, ...).
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

/// Result alias for ledger-core operations.
pub type Result<T> = core::result::Result<T, Error>;
