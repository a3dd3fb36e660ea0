//! # Custody Core
//!
//! Pure primitives for Custody: asset records, canonical encoding, signing,
//! and verification of a chain of custody.
//!
//! This crate contains no storage and no networking. History lives in an
//! external ledger, reached only through the [`Resolver`] trait.
//!
//! ## Key Types
//!
//! - [`AssetRecord`] - A signed statement of who owns a piece of content
//! - [`RecordKind`] - Mint or transfer, derived from `prev_position`
//! - [`TransferId`] - Blake3 digest binding a record's identity fields
//! - [`ContentHash`] - Blake3 digest of the asset's raw bytes
//! - [`Position`] - Where a record lives in the ledger
//!
//! ## Signing
//!
//! A mint is signed by its owner over the transfer id. A transfer is signed
//! by the outgoing owner over the full canonical record plus transfer id.
//! See [`signing`].
//!
//! ## Verification
//!
//! [`verify_record`] runs the full fail-fast algorithm; see [`verification`].

pub mod canonical;
pub mod crypto;
pub mod error;
pub mod record;
pub mod resolver;
pub mod signing;
pub mod types;
pub mod verification;
pub mod wire;

pub use canonical::{canonical_bytes, compute_transfer_id, signed_message, CANONICAL_LEN};
pub use crypto::{digest, digest_parts, Ed25519PublicKey, Ed25519Signature, Keypair, DIGEST_LEN};
pub use error::{ChainBreak, CoreError, IntegrityField, VerificationError};
pub use record::{AssetRecord, AssetRecordBuilder, RecordKind};
pub use resolver::{ResolveError, Resolver};
pub use signing::sign_record;
pub use types::{BlockHash, ContentHash, Position, TransferId};
pub use verification::{
    check_chain, verify_record, verify_record_with, verify_standalone, ContentPolicy, Standalone,
    Verifier, VerifyOptions,
};
pub use wire::{from_wire, to_wire};
