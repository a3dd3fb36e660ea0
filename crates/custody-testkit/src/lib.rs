//! # Custody Testkit
//!
//! Testing utilities for Custody.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known records with pinned outputs for cross-platform verification
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Helper structs for setting up multi-party scenarios
//!
//! ## Golden Vectors
//!
//! Golden vectors pin the canonical layout and transfer id:
//!
//! ```rust
//! use custody_testkit::vectors::{all_vectors, generate_record_from_vector};
//!
//! for vector in all_vectors() {
//!     let record = generate_record_from_vector(&vector);
//!     println!("{}: {}", vector.name, record.transfer_id.to_hex());
//! }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use custody_testkit::generators::{transfer_from_params, RecordParams};
//!
//! proptest! {
//!     #[test]
//!     fn transfer_id_is_deterministic(params: RecordParams) {
//!         let t1 = transfer_from_params(&params);
//!         let t2 = transfer_from_params(&params);
//!         prop_assert_eq!(t1.transfer_id, t2.transfer_id);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! Quickly set up test scenarios:
//!
//! ```rust
//! use custody_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let record = fixture.make_mint(b"initial data");
//! assert!(record.is_mint());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, pass_along, TestFixture};
pub use generators::{mint_from_params, transfer_from_params, RecordParams};
pub use vectors::{
    all_vectors, check_vector, export_json, generate_record_from_vector, verify_all_vectors,
    GoldenVector, VectorOutput,
};
