//! In-memory implementation of the Ledger trait.
//!
//! An append-only reference ledger. Records fill fixed-capacity blocks in
//! arrival order; nothing is persisted. Suitable for tests and for embedding
//! next to a real ledger service as a local cache of accepted history.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use custody_core::{
    digest_parts, verify_record_with, AssetRecord, BlockHash, ChainBreak, ContentHash, Position,
    RecordKind, ResolveError, Resolver, TransferId, VerificationError, VerifyOptions,
};

use crate::error::{LedgerError, Result};
use crate::traits::{Ledger, LedgerEntry, Rejection, SubmitResult};

/// Domain prefix for block identifiers.
const BLOCK_DOMAIN: &[u8] = b"custody-block-v0:";

/// Configuration for [`MemoryLedger`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Slots per block.
    pub block_capacity: u64,
    /// Whether to run the verification engine on every submission.
    pub verify_on_submit: bool,
    /// Verification options applied to submissions.
    #[serde(default)]
    pub verify: VerifyOptions,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            block_capacity: 16,
            verify_on_submit: true,
            verify: VerifyOptions::default(),
        }
    }
}

/// In-memory ledger.
///
/// All data is lost when the ledger is dropped. Thread-safe via RwLock;
/// each submission runs entirely under one write guard, so it is accepted
/// or rejected atomically.
pub struct MemoryLedger {
    config: LedgerConfig,
    inner: RwLock<MemoryLedgerInner>,
}

#[derive(Default)]
struct MemoryLedgerInner {
    /// Blocks in height order.
    blocks: Vec<Block>,

    /// Block hash -> height.
    heights: HashMap<BlockHash, usize>,

    /// Current head of each lineage.
    heads: HashMap<ContentHash, Position>,

    /// Every position holding a record with this transfer id.
    by_transfer_id: HashMap<TransferId, Vec<Position>>,

    /// Total stored records.
    count: u64,
}

struct Block {
    hash: BlockHash,
    records: Vec<AssetRecord>,
}

impl MemoryLedgerInner {
    fn get(&self, position: &Position) -> Option<&AssetRecord> {
        let height = *self.heights.get(&position.block)?;
        let slot = usize::try_from(position.index).ok()?;
        self.blocks.get(height)?.records.get(slot)
    }

    /// Append a record, opening a new block when the last one is full.
    fn append(&mut self, record: AssetRecord, capacity: u64) -> Position {
        let needs_block = self
            .blocks
            .last()
            .map_or(true, |b| b.records.len() as u64 >= capacity);

        if needs_block {
            let height = self.blocks.len();
            let hash = block_hash(height as u64);
            self.heights.insert(hash, height);
            self.blocks.push(Block {
                hash,
                records: Vec::new(),
            });
        }

        let height = self.blocks.len() - 1;
        let block = &mut self.blocks[height];
        let position = Position::new(block.hash, block.records.len() as u64);

        self.heads.insert(record.content_hash, position);
        self.by_transfer_id
            .entry(record.transfer_id)
            .or_default()
            .push(position);
        block.records.push(record);
        self.count += 1;
        position
    }

    /// Decide whether a record may be appended.
    fn admit(
        &self,
        record: &AssetRecord,
        content: Option<&[u8]>,
        config: &LedgerConfig,
    ) -> std::result::Result<(), Rejection> {
        if config.verify_on_submit {
            verify_record_with(record, content, &config.verify, |position| {
                Ok(self.get(position).cloned())
            })
            .map_err(Rejection::Invalid)?;
        }

        if let Some(positions) = self.by_transfer_id.get(&record.transfer_id) {
            for &existing in positions {
                if self
                    .get(&existing)
                    .is_some_and(|stored| stored.prev_position == record.prev_position)
                {
                    return Err(Rejection::Duplicate { existing });
                }
            }
            if let Some(&original) = positions.first() {
                return Err(Rejection::Replayed { original });
            }
        }

        let head = self.heads.get(&record.content_hash).copied();
        match (record.kind(), head) {
            (RecordKind::Mint, None) => Ok(()),
            (RecordKind::Mint, Some(head)) => Err(Rejection::AlreadyMinted { head }),
            (RecordKind::Transfer, Some(head)) if head == record.prev_position => Ok(()),
            (RecordKind::Transfer, Some(head)) => Err(Rejection::AlreadySpent { head }),
            (RecordKind::Transfer, None) => Err(Rejection::Invalid(
                VerificationError::ChainBroken(ChainBreak::PriorMissing),
            )),
        }
    }
}

impl MemoryLedger {
    /// Create a new empty ledger with default configuration.
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    /// Create a new empty ledger.
    pub fn with_config(config: LedgerConfig) -> Self {
        Self {
            config: LedgerConfig {
                block_capacity: config.block_capacity.max(1),
                ..config
            },
            inner: RwLock::new(MemoryLedgerInner::default()),
        }
    }

    /// The configuration in effect.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Number of blocks opened so far.
    pub fn block_count(&self) -> Result<usize> {
        let inner = self.inner.read().map_err(|_| LedgerError::Poisoned)?;
        Ok(inner.blocks.len())
    }

    fn get_record_sync(&self, position: &Position) -> Result<Option<AssetRecord>> {
        let inner = self.inner.read().map_err(|_| LedgerError::Poisoned)?;
        Ok(inner.get(position).cloned())
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier of the block at `height`.
pub fn block_hash(height: u64) -> BlockHash {
    BlockHash::from_bytes(digest_parts(&[BLOCK_DOMAIN, &height.to_be_bytes()]))
}

#[async_trait]
impl Resolver for MemoryLedger {
    async fn resolve(
        &self,
        position: &Position,
    ) -> std::result::Result<Option<AssetRecord>, ResolveError> {
        self.get_record_sync(position)
            .map_err(|e| ResolveError::new(e.to_string()))
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn submit(&self, record: &AssetRecord, content: Option<&[u8]>) -> Result<SubmitResult> {
        let mut inner = self.inner.write().map_err(|_| LedgerError::Poisoned)?;

        match inner.admit(record, content, &self.config) {
            Ok(()) => {
                let position = inner.append(record.clone(), self.config.block_capacity);
                debug!(
                    transfer_id = %record.transfer_id,
                    content = %record.content_hash,
                    kind = ?record.kind(),
                    %position,
                    "record accepted"
                );
                Ok(SubmitResult::Accepted(position))
            }
            Err(rejection) => {
                warn!(
                    transfer_id = %record.transfer_id,
                    code = rejection.code(),
                    "record rejected: {}",
                    rejection
                );
                Ok(SubmitResult::Rejected(rejection))
            }
        }
    }

    async fn get_record(&self, position: &Position) -> Result<Option<AssetRecord>> {
        self.get_record_sync(position)
    }

    async fn get_head(&self, content_hash: &ContentHash) -> Result<Option<LedgerEntry>> {
        let inner = self.inner.read().map_err(|_| LedgerError::Poisoned)?;
        let Some(&position) = inner.heads.get(content_hash) else {
            return Ok(None);
        };
        let record = inner
            .get(&position)
            .cloned()
            .ok_or(LedgerError::BrokenChain(position))?;
        Ok(Some(LedgerEntry { position, record }))
    }

    async fn record_count(&self) -> Result<u64> {
        let inner = self.inner.read().map_err(|_| LedgerError::Poisoned)?;
        Ok(inner.count)
    }
}
