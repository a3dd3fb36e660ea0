//! Signing: authorize a record with the key its kind requires.
//!
//! - Mint: the owner signs the transfer id.
//! - Transfer: the outgoing owner (`prev_owner`) signs the canonical bytes
//!   followed by the transfer id.
//!
//! The transfer id is recomputed immediately before signing, so a record
//! edited after an earlier signing never carries a stale id.

use crate::canonical::{compute_transfer_id, signed_message};
use crate::crypto::Keypair;
use crate::error::CoreError;
use crate::record::AssetRecord;

/// Set `transfer_id` and attach a signature from `keypair`.
///
/// Refuses to sign when `keypair` is not the record's required signer. A
/// refused record is left untouched.
pub fn sign_record(record: &mut AssetRecord, keypair: &Keypair) -> Result<(), CoreError> {
    let expected = *record.required_signer().ok_or(CoreError::MissingPrevOwner)?;
    let actual = keypair.public_key();
    if expected != actual {
        return Err(CoreError::WrongSigner { expected, actual });
    }

    record.transfer_id = compute_transfer_id(record);
    let message = signed_message(record);
    record.signature = Some(keypair.sign(&message));
    Ok(())
}
