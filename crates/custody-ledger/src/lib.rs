//! # Custody Ledger
//!
//! The contract Custody expects from an external ledger, plus an in-memory
//! reference implementation.
//!
//! ## Overview
//!
//! The ledger is the authority on history: it stores signed records at
//! [`Position`](custody_core::Position)s, reports the head of each asset's
//! lineage, and resolves positions for the verification engine. Real ledger
//! services implement [`Ledger`]; [`MemoryLedger`] is used for tests and
//! local embedding.
//!
//! ## Key Types
//!
//! - [`Ledger`] - The async trait for all ledger operations
//! - [`MemoryLedger`] - In-memory append-only ledger
//! - [`SubmitResult`] - Accepted at a position, or rejected with a reason
//! - [`Rejection`] - Why a submission was refused
//!
//! ## Usage
//!
//! ```rust
//! use custody_core::{AssetRecordBuilder, Keypair};
//! use custody_ledger::{Ledger, MemoryLedger, SubmitResult};
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let ledger = MemoryLedger::new();
//! let alice = Keypair::from_seed(&[0x0a; 32]);
//! let record = AssetRecordBuilder::mint_content(b"hello", alice.public_key())
//!     .sign(&alice)
//!     .unwrap();
//!
//! let result = ledger.submit(&record, Some(&b"hello"[..])).await.unwrap();
//! assert!(matches!(result, SubmitResult::Accepted(_)));
//! # });
//! ```
//!
//! ## Design Notes
//!
//! - **Atomic submission**: verification and append happen under one lock
//! - **Single head**: a transfer must supersede the current head of its lineage
//! - **Replay guard**: a transfer id is accepted once per lineage

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{LedgerError, Result};
pub use memory::{block_hash, LedgerConfig, MemoryLedger};
pub use traits::{Ledger, LedgerEntry, LedgerExt, Rejection, SubmitResult};
