//! Proptest generators for property-based testing.

use proptest::prelude::*;

use custody_core::{
    AssetRecord, AssetRecordBuilder, BlockHash, ContentHash, Ed25519PublicKey, Keypair, Position,
};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random Ed25519PublicKey.
pub fn public_key() -> impl Strategy<Value = Ed25519PublicKey> {
    keypair().prop_map(|kp| kp.public_key())
}

/// Generate a random ContentHash.
pub fn content_hash() -> impl Strategy<Value = ContentHash> {
    any::<[u8; 32]>().prop_map(ContentHash::from_bytes)
}

/// Generate a non-genesis Position.
pub fn position() -> impl Strategy<Value = Position> {
    (any::<[u8; 32]>(), any::<u64>())
        .prop_map(|(block, index)| Position::new(BlockHash::from_bytes(block), index))
        .prop_filter("genesis is reserved", |p| !p.is_zero())
}

/// Generate content bytes of specified max length.
pub fn content(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Parameters for generating a mint and a transfer of it.
#[derive(Debug, Clone)]
pub struct RecordParams {
    pub owner: Keypair,
    pub recipient: Keypair,
    pub content: Vec<u8>,
    pub mint_position: Position,
}

impl Arbitrary for RecordParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            any::<[u8; 32]>(), // owner seed
            any::<[u8; 32]>(), // recipient seed
            content(256),
            position(),
        )
            .prop_map(|(owner, recipient, content, mint_position)| RecordParams {
                owner: Keypair::from_seed(&owner),
                recipient: Keypair::from_seed(&recipient),
                content,
                mint_position,
            })
            .boxed()
    }
}

/// Generate a signed mint from parameters.
pub fn mint_from_params(params: &RecordParams) -> AssetRecord {
    AssetRecordBuilder::mint_content(&params.content, params.owner.public_key())
        .sign(&params.owner)
        .expect("owner signs its own mint")
}

/// Generate a signed transfer of the params' mint to the recipient.
pub fn transfer_from_params(params: &RecordParams) -> AssetRecord {
    let mint = mint_from_params(params);
    AssetRecordBuilder::transfer(params.mint_position, &mint, params.recipient.public_key())
        .sign(&params.owner)
        .expect("owner signs the outgoing transfer")
}
