//! Error types for Custody Core.

use std::fmt;

use thiserror::Error;

use crate::crypto::Ed25519PublicKey;

/// Core errors that can occur while signing or encoding records.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("wrong signer: record requires {expected}, keypair is {actual}")]
    WrongSigner {
        expected: Ed25519PublicKey,
        actual: Ed25519PublicKey,
    },

    #[error("transfer record has no prev_owner")]
    MissingPrevOwner,

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Which integrity binding failed to recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityField {
    /// The claimed transfer id differs from Digest(canonical bytes).
    TransferId,
    /// The content hash differs from Digest(content).
    ContentHash,
}

impl fmt::Display for IntegrityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransferId => write!(f, "transfer_id"),
            Self::ContentHash => write!(f, "content_hash"),
        }
    }
}

/// How a transfer failed to anchor to its prior record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainBreak {
    /// Nothing is recorded at `prev_position`.
    PriorMissing,
    /// The prior record's owner is not the claimed `prev_owner`.
    OwnerMismatch,
    /// The prior record is for different content.
    ContentMismatch,
    /// The prior record names a different creator.
    CreatorMismatch,
}

impl fmt::Display for ChainBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PriorMissing => write!(f, "no record at prev_position"),
            Self::OwnerMismatch => write!(f, "prior owner is not prev_owner"),
            Self::ContentMismatch => write!(f, "prior content_hash differs"),
            Self::CreatorMismatch => write!(f, "prior creator differs"),
        }
    }
}

/// Verification failures. The first failing check decides the variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("integrity mismatch: {0}")]
    IntegrityMismatch(IntegrityField),

    #[error("ownership violation: mint creator is not its owner")]
    OwnershipViolation,

    #[error("signature verification failed")]
    BadSignature,

    #[error("malformed record: {0}")]
    Malformed(String),

    #[error("chain broken: {0}")]
    ChainBroken(ChainBreak),

    #[error("lookup unavailable: {0}")]
    LookupUnavailable(String),
}

impl VerificationError {
    /// Stable taxonomy code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::IntegrityMismatch(_) => "INTEGRITY_MISMATCH",
            Self::OwnershipViolation => "OWNERSHIP_VIOLATION",
            Self::BadSignature => "BAD_SIGNATURE",
            Self::Malformed(_) => "MALFORMED",
            Self::ChainBroken(_) => "CHAIN_BROKEN",
            Self::LookupUnavailable(_) => "LOOKUP_UNAVAILABLE",
        }
    }

    /// Whether the caller may retry the same record later.
    ///
    /// Only resolver failures are transient; everything else is a terminal
    /// rejection of that record.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LookupUnavailable(_))
    }
}

impl From<CoreError> for VerificationError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidSignature | CoreError::InvalidPublicKey => {
                VerificationError::BadSignature
            }
            CoreError::MissingPrevOwner => {
                VerificationError::Malformed("transfer requires prev_owner".into())
            }
            CoreError::WrongSigner { .. } => VerificationError::BadSignature,
            CoreError::EncodingError(msg) | CoreError::DecodingError(msg) => {
                VerificationError::Malformed(msg)
            }
        }
    }
}
