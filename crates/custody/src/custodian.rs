//! The Custodian: unified API for minting, transferring, and auditing assets.
//!
//! A custodian holds one identity keypair and talks to a ledger. It builds
//! and signs records on behalf of that identity, and verifies anything it
//! reads back.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use custody_core::{
    verify_record, verify_record_with, AssetRecord, AssetRecordBuilder, ContentHash,
    Ed25519PublicKey, Keypair, Position, RecordKind, VerifyOptions,
};
use custody_ledger::{Ledger, LedgerEntry, LedgerExt, SubmitResult};

use crate::error::{CustodyError, Result};

/// Configuration for the Custodian.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustodyConfig {
    /// Whether to verify records locally before submitting them.
    pub verify_before_submit: bool,
    /// Whether `history` re-verifies every link it reads.
    pub verify_history: bool,
    /// Options for local verification.
    #[serde(default)]
    pub verify: VerifyOptions,
}

impl Default for CustodyConfig {
    fn default() -> Self {
        Self {
            verify_before_submit: true,
            verify_history: true,
            verify: VerifyOptions::default(),
        }
    }
}

/// The main Custodian struct.
///
/// Provides a unified API for:
/// - Minting content
/// - Transferring owned assets
/// - Verifying records against the ledger
/// - Walking an asset's chain of custody
pub struct Custodian<L: Ledger> {
    /// The identity keypair for this custodian.
    keypair: Keypair,
    /// The ledger backend.
    ledger: Arc<L>,
    /// Configuration.
    config: CustodyConfig,
    /// Serializes read-head, sign, submit sequences.
    submit_lock: Mutex<()>,
}

impl<L: Ledger> Custodian<L> {
    /// Create a new custodian that owns its ledger handle.
    pub fn new(keypair: Keypair, ledger: L, config: CustodyConfig) -> Self {
        Self::with_shared(keypair, Arc::new(ledger), config)
    }

    /// Create a custodian over a ledger shared with other custodians.
    pub fn with_shared(keypair: Keypair, ledger: Arc<L>, config: CustodyConfig) -> Self {
        Self {
            keypair,
            ledger,
            config,
            submit_lock: Mutex::new(()),
        }
    }

    /// Get the custodian's public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.keypair.public_key()
    }

    /// Get the ledger reference.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Get the configuration.
    pub fn config(&self) -> &CustodyConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Minting
    // ─────────────────────────────────────────────────────────────────────────

    /// Mint `content`, claiming this custodian as creator and owner.
    pub async fn mint(&self, content: &[u8]) -> Result<LedgerEntry> {
        let record =
            AssetRecordBuilder::mint_content(content, self.public_key()).sign(&self.keypair)?;

        let _guard = self.submit_lock.lock().await;
        let entry = self.submit_own(record, Some(content)).await?;
        info!(content = %entry.record.content_hash, position = %entry.position, "minted");
        Ok(entry)
    }

    /// Mint by content hash when the raw bytes are not at hand.
    pub async fn mint_hash(&self, content_hash: ContentHash) -> Result<LedgerEntry> {
        let record =
            AssetRecordBuilder::mint(content_hash, self.public_key()).sign(&self.keypair)?;

        let _guard = self.submit_lock.lock().await;
        let entry = self.submit_own(record, None).await?;
        info!(content = %content_hash, position = %entry.position, "minted by hash");
        Ok(entry)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transfers
    // ─────────────────────────────────────────────────────────────────────────

    /// Transfer an owned asset to `recipient`.
    ///
    /// Reads the current head, refuses unless this custodian owns it, then
    /// signs and submits a transfer superseding that head.
    pub async fn transfer(
        &self,
        content_hash: &ContentHash,
        recipient: Ed25519PublicKey,
    ) -> Result<LedgerEntry> {
        let _guard = self.submit_lock.lock().await;

        let head = self
            .ledger
            .get_head(content_hash)
            .await?
            .ok_or(CustodyError::NotFound(*content_hash))?;

        if head.record.owner != self.public_key() {
            return Err(CustodyError::NotOwner {
                content: *content_hash,
                owner: head.record.owner,
            });
        }

        let record = AssetRecordBuilder::transfer(head.position, &head.record, recipient)
            .sign(&self.keypair)?;
        let entry = self.submit_own(record, None).await?;
        info!(
            content = %content_hash,
            to = %recipient,
            position = %entry.position,
            "transferred"
        );
        Ok(entry)
    }

    /// Submit a record signed elsewhere.
    ///
    /// Verified locally first when `verify_before_submit` is set.
    pub async fn submit(&self, record: &AssetRecord, content: Option<&[u8]>) -> Result<Position> {
        let _guard = self.submit_lock.lock().await;
        let entry = self.submit_own(record.clone(), content).await?;
        Ok(entry.position)
    }

    async fn submit_own(&self, record: AssetRecord, content: Option<&[u8]>) -> Result<LedgerEntry> {
        if self.config.verify_before_submit {
            self.verify(&record, content).await?;
        }

        match self.ledger.submit(&record, content).await? {
            SubmitResult::Accepted(position) => Ok(LedgerEntry { position, record }),
            SubmitResult::Rejected(rejection) => {
                warn!(
                    transfer_id = %record.transfer_id,
                    code = rejection.code(),
                    "submission rejected"
                );
                Err(CustodyError::Rejected(rejection))
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Verify a record against the ledger.
    pub async fn verify(&self, record: &AssetRecord, content: Option<&[u8]>) -> Result<RecordKind> {
        let kind = verify_record(record, content, &self.config.verify, self.ledger.as_ref()).await?;
        Ok(kind)
    }

    /// Get the record at a position.
    pub async fn lookup(&self, position: &Position) -> Result<Option<AssetRecord>> {
        Ok(self.ledger.get_record(position).await?)
    }

    /// Get the current head of an asset.
    pub async fn head(&self, content_hash: &ContentHash) -> Result<Option<LedgerEntry>> {
        Ok(self.ledger.get_head(content_hash).await?)
    }

    /// Current owner of an asset.
    pub async fn owner_of(&self, content_hash: &ContentHash) -> Result<Ed25519PublicKey> {
        self.head(content_hash)
            .await?
            .map(|entry| entry.record.owner)
            .ok_or(CustodyError::NotFound(*content_hash))
    }

    /// The chain of custody of an asset, mint first.
    ///
    /// When `verify_history` is set every link is re-verified against the
    /// chain itself; content is never available here, so the content policy
    /// is not applied.
    pub async fn history(&self, content_hash: &ContentHash) -> Result<Vec<LedgerEntry>> {
        let chain = self.ledger.custody_chain(content_hash).await?;
        if chain.is_empty() {
            return Err(CustodyError::NotFound(*content_hash));
        }

        if self.config.verify_history {
            let by_position: HashMap<Position, &AssetRecord> =
                chain.iter().map(|e| (e.position, &e.record)).collect();
            let options = VerifyOptions::default();

            for entry in &chain {
                verify_record_with(&entry.record, None, &options, |position| {
                    Ok(by_position.get(position).map(|r| (*r).clone()))
                })?;
            }
        }

        debug!(content = %content_hash, links = chain.len(), "history walked");
        Ok(chain)
    }
}
