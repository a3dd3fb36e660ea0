//! AssetRecord: the unit of ownership history.
//!
//! A record is either a mint (no prior record) or a transfer superseding the
//! record at `prev_position`. The kind is derived from `prev_position`, never
//! stored. Records are immutable once signed; a change of owner is a new record.

use serde::{Deserialize, Serialize};

use crate::canonical::compute_transfer_id;
use crate::crypto::{Ed25519PublicKey, Ed25519Signature, Keypair};
use crate::error::CoreError;
use crate::signing::sign_record;
use crate::types::{ContentHash, Position, TransferId};

/// Whether a record creates an asset or moves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// First record of an asset; self-authorized by its owner.
    Mint,
    /// Supersedes a prior record; authorized by the outgoing owner.
    Transfer,
}

/// A signed statement of who owns a piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Digest of the asset's raw bytes.
    pub content_hash: ContentHash,

    /// The record being superseded (zero for a mint).
    #[serde(default)]
    pub prev_position: Position,

    /// The owner relinquishing the asset (transfers only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_owner: Option<Ed25519PublicKey>,

    /// The resulting owner.
    pub owner: Ed25519PublicKey,

    /// The minting owner, constant across the lineage.
    pub creator: Ed25519PublicKey,

    /// Digest of the canonical bytes, set by signing.
    pub transfer_id: TransferId,

    /// Authorization; absent until the record is signed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Ed25519Signature>,
}

impl AssetRecord {
    /// The derived record kind.
    pub fn kind(&self) -> RecordKind {
        if self.prev_position.is_zero() {
            RecordKind::Mint
        } else {
            RecordKind::Transfer
        }
    }

    /// Check if this record mints a new asset.
    pub fn is_mint(&self) -> bool {
        self.kind() == RecordKind::Mint
    }

    /// Check if this record transfers an existing asset.
    pub fn is_transfer(&self) -> bool {
        self.kind() == RecordKind::Transfer
    }

    /// Check if a signature is attached.
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Recompute the transfer id from the current field values.
    pub fn compute_transfer_id(&self) -> TransferId {
        compute_transfer_id(self)
    }

    /// Set the transfer id and sign with the key this record's kind requires.
    ///
    /// On error the record is left unchanged.
    pub fn sign(&mut self, keypair: &Keypair) -> Result<(), CoreError> {
        sign_record(self, keypair)
    }

    /// The key whose signature authorizes this record.
    ///
    /// `None` only for a transfer missing its `prev_owner`.
    pub fn required_signer(&self) -> Option<&Ed25519PublicKey> {
        match self.kind() {
            RecordKind::Mint => Some(&self.owner),
            RecordKind::Transfer => self.prev_owner.as_ref(),
        }
    }
}

/// Builder for creating asset records.
///
/// ```
/// use custody_core::{AssetRecordBuilder, Keypair};
///
/// let alice = Keypair::from_seed(&[0x0a; 32]);
/// let record = AssetRecordBuilder::mint_content(b"hello", alice.public_key())
///     .sign(&alice)
///     .unwrap();
/// assert!(record.is_mint());
/// ```
pub struct AssetRecordBuilder {
    content_hash: ContentHash,
    prev_position: Position,
    prev_owner: Option<Ed25519PublicKey>,
    owner: Ed25519PublicKey,
    creator: Ed25519PublicKey,
}

impl AssetRecordBuilder {
    /// Start a mint record: owner and creator are both `owner`.
    pub fn mint(content_hash: ContentHash, owner: Ed25519PublicKey) -> Self {
        Self {
            content_hash,
            prev_position: Position::ZERO,
            prev_owner: None,
            owner,
            creator: owner,
        }
    }

    /// Start a mint record from raw content, hashing it first.
    pub fn mint_content(content: &[u8], owner: Ed25519PublicKey) -> Self {
        Self::mint(ContentHash::of(content), owner)
    }

    /// Start a transfer of `prior` (stored at `prior_position`) to `recipient`.
    ///
    /// Content hash and creator are carried over from the prior record and
    /// the prior owner becomes `prev_owner`.
    pub fn transfer(
        prior_position: Position,
        prior: &AssetRecord,
        recipient: Ed25519PublicKey,
    ) -> Self {
        Self {
            content_hash: prior.content_hash,
            prev_position: prior_position,
            prev_owner: Some(prior.owner),
            owner: recipient,
            creator: prior.creator,
        }
    }

    /// Override the creator.
    pub fn creator(mut self, creator: Ed25519PublicKey) -> Self {
        self.creator = creator;
        self
    }

    /// Override the outgoing owner.
    pub fn prev_owner(mut self, prev_owner: Option<Ed25519PublicKey>) -> Self {
        self.prev_owner = prev_owner;
        self
    }

    /// Override the prior position.
    pub fn prev_position(mut self, position: Position) -> Self {
        self.prev_position = position;
        self
    }

    /// Build the unsigned record with its transfer id filled in.
    pub fn build(self) -> AssetRecord {
        let mut record = AssetRecord {
            content_hash: self.content_hash,
            prev_position: self.prev_position,
            prev_owner: self.prev_owner,
            owner: self.owner,
            creator: self.creator,
            transfer_id: TransferId::ZERO,
            signature: None,
        };
        record.transfer_id = record.compute_transfer_id();
        record
    }

    /// Build and sign the record.
    pub fn sign(self, keypair: &Keypair) -> Result<AssetRecord, CoreError> {
        let mut record = self.build();
        record.sign(keypair)?;
        Ok(record)
    }
}
