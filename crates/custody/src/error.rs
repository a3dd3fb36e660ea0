//! Error types for the Custodian.

use custody_core::{ContentHash, CoreError, Ed25519PublicKey, VerificationError};
use custody_ledger::{LedgerError, Rejection};
use thiserror::Error;

/// Errors that can occur during Custodian operations.
#[derive(Debug, Error)]
pub enum CustodyError {
    /// Verification error.
    #[error("verification failed: {0}")]
    Verification(#[from] VerificationError),

    /// Ledger error.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Signing or encoding error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// The ledger refused a submission.
    #[error("rejected: {0}")]
    Rejected(Rejection),

    /// No asset with this content hash has been minted.
    #[error("asset not found: {0}")]
    NotFound(ContentHash),

    /// This custodian is not the current owner.
    #[error("not owner of {content}: current owner is {owner}")]
    NotOwner {
        content: ContentHash,
        owner: Ed25519PublicKey,
    },
}

impl CustodyError {
    /// Whether retrying the operation later could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Verification(e) => e.is_retryable(),
            Self::Rejected(r) => r.is_retryable(),
            Self::Ledger(LedgerError::Unavailable(_)) => true,
            _ => false,
        }
    }
}

/// Result type for Custodian operations.
pub type Result<T> = std::result::Result<T, CustodyError>;

#[cfg(test)]
mod tests {
    use super::*;
    use custody_core::ResolveError;

    #[test]
    fn test_outages_are_retryable() {
        let down = ResolveError::new("ledger offline");

        let lookup: CustodyError = LedgerError::from(down.clone()).into();
        assert!(matches!(lookup, CustodyError::Ledger(LedgerError::Unavailable(_))));
        assert!(lookup.is_retryable());

        let verify: CustodyError = VerificationError::LookupUnavailable(down.0).into();
        assert!(verify.is_retryable());
    }

    #[test]
    fn test_rejections_are_final() {
        let forged: CustodyError = VerificationError::BadSignature.into();
        assert!(!forged.is_retryable());
        assert!(!CustodyError::NotFound(ContentHash::of(b"hello")).is_retryable());
        assert!(!CustodyError::from(LedgerError::Poisoned).is_retryable());
    }
}
