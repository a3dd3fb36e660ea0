//! Error types for the ledger module.

use custody_core::{CoreError, Position, ResolveError};
use thiserror::Error;

/// Errors that can occur during ledger operations.
///
/// A rejected submission is not an error; see [`crate::SubmitResult`].
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A lock guarding ledger state was poisoned by a panicking writer.
    #[error("ledger state poisoned")]
    Poisoned,

    /// The ledger could not answer.
    #[error("ledger unavailable: {0}")]
    Unavailable(#[from] ResolveError),

    /// A record's `prev_position` points at nothing.
    #[error("broken chain: no record at {0}")]
    BrokenChain(Position),

    /// Following `prev_position` revisited a position.
    #[error("cycle in chain at {0}")]
    Cycle(Position),

    /// Transport encoding failed.
    #[error("codec error: {0}")]
    Codec(#[from] CoreError),
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
