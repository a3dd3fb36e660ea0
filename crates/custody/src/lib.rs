//! # Custody
//!
//! Signed, verifiable chains of ownership for digital content.
//!
//! ## Overview
//!
//! Custody lets a creator claim a piece of content (a *mint*) and lets each
//! owner hand it on (a *transfer*). Every record is signed and anchored to
//! the record it supersedes, so anyone holding the ledger can check who owns
//! what and how it got there.
//!
//! - **Records**: Immutable, signed statements of ownership
//! - **Ledger**: External, append-only history addressed by position
//! - **Verification**: Fail-fast checks of integrity, signature, and chain
//!
//! ## Usage
//!
//! ```rust
//! use custody::{Custodian, CustodyConfig};
//! use custody::core::{ContentHash, Keypair};
//! use custody::ledger::MemoryLedger;
//!
//! async fn example() -> custody::Result<()> {
//!     let alice = Custodian::new(Keypair::generate(), MemoryLedger::new(), CustodyConfig::default());
//!     let bob = Keypair::generate();
//!
//!     alice.mint(b"hello").await?;
//!     alice.transfer(&ContentHash::of(b"hello"), bob.public_key()).await?;
//!
//!     let history = alice.history(&ContentHash::of(b"hello")).await?;
//!     assert_eq!(history.len(), 2);
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `custody::core` - Records, signing, verification
//! - `custody::ledger` - Ledger contract and in-memory ledger

pub mod custodian;
pub mod error;

// Re-export component crates
pub use custody_core as core;
pub use custody_ledger as ledger;

pub use custodian::{Custodian, CustodyConfig};
pub use error::{CustodyError, Result};

// Re-export commonly used types
pub use custody_core::{
    AssetRecord, AssetRecordBuilder, ContentHash, Ed25519PublicKey, Keypair, Position, RecordKind,
    TransferId, VerificationError,
};
pub use custody_ledger::{Ledger, LedgerEntry, MemoryLedger, Rejection, SubmitResult};
