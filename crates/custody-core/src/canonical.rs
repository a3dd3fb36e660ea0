//! Canonical encoding for hashing and signing.
//!
//! The canonical form of a record is a fixed-width, fixed-order
//! concatenation with no separators:
//!
//! ```text
//! offset  width  field
//! 0       32     content_hash
//! 32      32     prev_owner (zero-filled when absent)
//! 64      32     owner
//! 96      32     creator
//! ```
//!
//! `transfer_id` and `signature` are never part of the canonical form, and
//! raw content never enters it (only its digest does). Every field has a
//! fixed width, so two different records cannot produce the same bytes by
//! shifting a boundary.
//!
//! This layout is distinct from the transport encoding in [`crate::wire`].

use crate::crypto::digest;
use crate::record::{AssetRecord, RecordKind};
use crate::types::TransferId;

/// Width of every canonical field.
pub const FIELD_WIDTH: usize = 32;

/// Length of the canonical encoding.
pub const CANONICAL_LEN: usize = 4 * FIELD_WIDTH;

/// Length of a transfer's signed message (canonical bytes || transfer id).
pub const TRANSFER_MESSAGE_LEN: usize = CANONICAL_LEN + FIELD_WIDTH;

/// Byte offsets of each field in the canonical form.
pub mod offsets {
    use super::FIELD_WIDTH;

    pub const CONTENT_HASH: usize = 0;
    pub const PREV_OWNER: usize = FIELD_WIDTH;
    pub const OWNER: usize = 2 * FIELD_WIDTH;
    pub const CREATOR: usize = 3 * FIELD_WIDTH;
}

const ABSENT_KEY: [u8; FIELD_WIDTH] = [0u8; FIELD_WIDTH];

/// Encode a record's identity fields to canonical bytes.
pub fn canonical_bytes(record: &AssetRecord) -> [u8; CANONICAL_LEN] {
    let mut buf = [0u8; CANONICAL_LEN];
    let prev_owner = record
        .prev_owner
        .as_ref()
        .map(|pk| pk.as_bytes())
        .unwrap_or(&ABSENT_KEY);

    buf[offsets::CONTENT_HASH..offsets::PREV_OWNER].copy_from_slice(record.content_hash.as_bytes());
    buf[offsets::PREV_OWNER..offsets::OWNER].copy_from_slice(prev_owner);
    buf[offsets::OWNER..offsets::CREATOR].copy_from_slice(record.owner.as_bytes());
    buf[offsets::CREATOR..CANONICAL_LEN].copy_from_slice(record.creator.as_bytes());
    buf
}

/// Compute `TransferId = Blake3(canonical_bytes(record))`.
pub fn compute_transfer_id(record: &AssetRecord) -> TransferId {
    TransferId::from_bytes(digest(&canonical_bytes(record)))
}

/// Construct the message a record's signature covers.
///
/// - Mint: the transfer id alone.
/// - Transfer: canonical bytes followed by the transfer id, so the outgoing
///   owner's signature binds the recipient and content, not just an opaque id.
///
/// Uses the record's stored `transfer_id`; signing sets it first.
pub fn signed_message(record: &AssetRecord) -> Vec<u8> {
    match record.kind() {
        RecordKind::Mint => record.transfer_id.as_bytes().to_vec(),
        RecordKind::Transfer => {
            let mut buf = Vec::with_capacity(TRANSFER_MESSAGE_LEN);
            buf.extend_from_slice(&canonical_bytes(record));
            buf.extend_from_slice(record.transfer_id.as_bytes());
            buf
        }
    }
}
