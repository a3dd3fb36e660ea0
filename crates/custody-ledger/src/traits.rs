//! Ledger trait: the contract Custody expects from a ledger service.
//!
//! The ledger is the only authority on history. It resolves positions to
//! records, reports the current head of each asset, and accepts or rejects
//! submissions as a single atomic outcome.

use std::collections::HashSet;

use async_trait::async_trait;
use custody_core::{
    from_wire, to_wire, AssetRecord, ContentHash, Position, Resolver, VerificationError,
};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};

/// A record together with the position it occupies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Where the record is stored.
    pub position: Position,
    /// The stored record.
    pub record: AssetRecord,
}

impl LedgerEntry {
    /// Encode for transport.
    pub fn to_wire(&self) -> Result<Vec<u8>> {
        Ok(to_wire(self)?.to_vec())
    }

    /// Decode from transport bytes.
    pub fn from_wire(bytes: &[u8]) -> Result<Self> {
        Ok(from_wire(bytes)?)
    }
}

/// Why a submission was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The record failed verification.
    Invalid(VerificationError),
    /// The identical record is already stored.
    Duplicate {
        /// Where the stored copy lives.
        existing: Position,
    },
    /// A transfer already used in this asset's lineage, re-anchored to a
    /// different prior position.
    Replayed {
        /// Where the original use is stored.
        original: Position,
    },
    /// The content has already been minted.
    AlreadyMinted {
        /// Current head of the existing lineage.
        head: Position,
    },
    /// The transfer supersedes a record that is no longer the head.
    AlreadySpent {
        /// Current head of the lineage.
        head: Position,
    },
}

impl Rejection {
    /// Stable code for this rejection.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Invalid(e) => e.code(),
            Self::Duplicate { .. } => "DUPLICATE",
            Self::Replayed { .. } => "REPLAYED",
            Self::AlreadyMinted { .. } => "ALREADY_MINTED",
            Self::AlreadySpent { .. } => "ALREADY_SPENT",
        }
    }

    /// Whether resubmitting the same record later could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Invalid(e) if e.is_retryable())
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(e) => write!(f, "{}", e),
            Self::Duplicate { existing } => write!(f, "duplicate of record at {}", existing),
            Self::Replayed { original } => write!(f, "replay of record at {}", original),
            Self::AlreadyMinted { head } => write!(f, "already minted, head at {}", head),
            Self::AlreadySpent { head } => write!(f, "prior already superseded, head at {}", head),
        }
    }
}

/// Outcome of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitResult {
    /// Stored at the given position.
    Accepted(Position),
    /// Refused; nothing was stored.
    Rejected(Rejection),
}

impl SubmitResult {
    /// The assigned position, if accepted.
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Accepted(p) => Some(*p),
            Self::Rejected(_) => None,
        }
    }
}

/// The Ledger trait: async interface to the authoritative history.
///
/// "Not found" is always `Ok(None)`, never a zeroed record.
///
/// # Design Notes
///
/// - **Atomic submission**: a record is either stored in full or not at all.
/// - **Single head per asset**: a transfer must supersede the current head,
///   which prevents forked ownership histories.
/// - **Resolver**: every ledger is also a [`Resolver`] for verification.
#[async_trait]
pub trait Ledger: Resolver {
    /// Submit a signed record.
    ///
    /// `content` is the asset's raw bytes when the submitter has them.
    async fn submit(&self, record: &AssetRecord, content: Option<&[u8]>) -> Result<SubmitResult>;

    /// Get the record at a position.
    async fn get_record(&self, position: &Position) -> Result<Option<AssetRecord>>;

    /// Get the current head (latest record) of an asset's lineage.
    async fn get_head(&self, content_hash: &ContentHash) -> Result<Option<LedgerEntry>>;

    /// Number of stored records.
    async fn record_count(&self) -> Result<u64>;
}

/// Extension trait for walking history.
pub trait LedgerExt: Ledger {
    /// The chain of custody of an asset, oldest (mint) first.
    ///
    /// Empty if the content was never minted.
    fn custody_chain(
        &self,
        content_hash: &ContentHash,
    ) -> impl std::future::Future<Output = Result<Vec<LedgerEntry>>> + Send;
}

impl<L: Ledger + ?Sized> LedgerExt for L {
    async fn custody_chain(&self, content_hash: &ContentHash) -> Result<Vec<LedgerEntry>> {
        let Some(head) = self.get_head(content_hash).await? else {
            return Ok(Vec::new());
        };

        let mut visited = HashSet::new();
        visited.insert(head.position);
        let mut chain = vec![head];

        loop {
            let current = &chain[chain.len() - 1].record;
            if current.is_mint() {
                break;
            }

            let position = current.prev_position;
            if !visited.insert(position) {
                return Err(LedgerError::Cycle(position));
            }
            let record = self
                .get_record(&position)
                .await?
                .ok_or(LedgerError::BrokenChain(position))?;
            chain.push(LedgerEntry { position, record });
        }

        chain.reverse();
        Ok(chain)
    }
}
