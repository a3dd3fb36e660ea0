//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use custody::{Custodian, CustodyConfig};
use custody_core::{AssetRecord, AssetRecordBuilder, Ed25519PublicKey, Keypair, Position};
use custody_ledger::{Ledger, MemoryLedger, SubmitResult};

/// A test party: a keypair and a handle to a (possibly shared) ledger.
pub struct TestFixture {
    pub keypair: Keypair,
    pub ledger: Arc<MemoryLedger>,
}

impl TestFixture {
    /// Create a new test fixture with a random keypair and its own ledger.
    pub fn new() -> Self {
        Self {
            keypair: Keypair::generate(),
            ledger: Arc::new(MemoryLedger::new()),
        }
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self::on_ledger(seed, Arc::new(MemoryLedger::new()))
    }

    /// Create with a deterministic keypair on an existing ledger.
    pub fn on_ledger(seed: [u8; 32], ledger: Arc<MemoryLedger>) -> Self {
        Self {
            keypair: Keypair::from_seed(&seed),
            ledger,
        }
    }

    /// Get the keypair's public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.keypair.public_key()
    }

    /// A custodian acting for this party on the fixture's ledger.
    pub fn custodian(&self) -> Custodian<MemoryLedger> {
        Custodian::with_shared(
            Keypair::from_seed(&self.keypair.seed()),
            Arc::clone(&self.ledger),
            CustodyConfig::default(),
        )
    }

    /// Create a signed mint of `content` owned by this party.
    pub fn make_mint(&self, content: &[u8]) -> AssetRecord {
        AssetRecordBuilder::mint_content(content, self.public_key())
            .sign(&self.keypair)
            .expect("fixture owns its mint")
    }

    /// Create a signed transfer of `prior` to `recipient`.
    ///
    /// Panics if this party is not the prior owner.
    pub fn make_transfer(
        &self,
        prior_position: Position,
        prior: &AssetRecord,
        recipient: Ed25519PublicKey,
    ) -> AssetRecord {
        AssetRecordBuilder::transfer(prior_position, prior, recipient)
            .sign(&self.keypair)
            .expect("fixture must be the prior owner")
    }

    /// Submit a record to the fixture's ledger, panicking on rejection.
    pub async fn submit(&self, record: &AssetRecord) -> Position {
        match self.ledger.submit(record, None).await {
            Ok(SubmitResult::Accepted(position)) => position,
            Ok(SubmitResult::Rejected(rejection)) => panic!("fixture record rejected: {rejection}"),
            Err(e) => panic!("ledger error: {e}"),
        }
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple test fixtures sharing one ledger.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    let ledger = Arc::new(MemoryLedger::new());
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            TestFixture::on_ledger(seed, Arc::clone(&ledger))
        })
        .collect()
}

/// Mint `content` by the first party and pass it along to each next party.
///
/// Returns every accepted record with its position, mint first.
pub async fn pass_along(parties: &[TestFixture], content: &[u8]) -> Vec<(Position, AssetRecord)> {
    let Some(first) = parties.first() else {
        return Vec::new();
    };

    let mint = first.make_mint(content);
    let mut chain = vec![(first.submit(&mint).await, mint)];

    for pair in parties.windows(2) {
        let (position, prior) = chain[chain.len() - 1].clone();
        let record = pair[0].make_transfer(position, &prior, pair[1].public_key());
        chain.push((pair[0].submit(&record).await, record));
    }
    chain
}
