//! Resolver: the seam through which verification reaches the ledger.
//!
//! The core never stores history. Transfer verification asks an injected
//! resolver for the record at `prev_position`; everything else is local.

use async_trait::async_trait;
use thiserror::Error;

use crate::record::AssetRecord;
use crate::types::Position;

/// The resolver could not answer (as opposed to answering "not found").
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("resolver unavailable: {0}")]
pub struct ResolveError(pub String);

impl ResolveError {
    /// Create a resolve error from any message.
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Maps a ledger position to the record stored there.
///
/// `Ok(None)` means the ledger answered and holds nothing at that position.
/// `Err` means it could not answer; callers may retry.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Look up the record at `position`.
    async fn resolve(&self, position: &Position) -> Result<Option<AssetRecord>, ResolveError>;
}

#[async_trait]
impl<R: Resolver + ?Sized> Resolver for &R {
    async fn resolve(&self, position: &Position) -> Result<Option<AssetRecord>, ResolveError> {
        (**self).resolve(position).await
    }
}

#[async_trait]
impl<R: Resolver + ?Sized> Resolver for std::sync::Arc<R> {
    async fn resolve(&self, position: &Position) -> Result<Option<AssetRecord>, ResolveError> {
        (**self).resolve(position).await
    }
}
