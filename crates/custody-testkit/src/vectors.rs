//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the transfer id and (deterministic Ed25519) signature
//! of known records, so any other implementation can be checked byte for
//! byte. The canonical layout and signed message are exported alongside.

use serde::{Deserialize, Serialize};

use custody_core::{
    canonical_bytes, signed_message, AssetRecord, AssetRecordBuilder, BlockHash, Keypair, Position,
};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Seed of the signing owner.
    pub owner_seed: [u8; 32],
    /// Seed of the recipient, for transfers.
    pub recipient_seed: Option<[u8; 32]>,
    /// Raw content bytes.
    pub content: &'static [u8],
    /// Position of the prior mint, for transfers.
    pub prior_position: Position,
    /// Expected transfer id (hex).
    pub expected_transfer_id: &'static str,
    /// Expected Ed25519 signature (hex).
    pub expected_signature: &'static str,
}

/// Derived outputs of a vector, in the form exported to other implementations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorOutput {
    pub name: String,
    pub owner_pk: String,
    pub content_hash: String,
    pub canonical_bytes: String,
    pub transfer_id: String,
    pub signed_message: String,
    pub signature: String,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "Mint of hello",
            owner_seed: [0x42; 32],
            recipient_seed: None,
            content: b"hello",
            prior_position: Position::ZERO,
            expected_transfer_id: "9faf1e13a34d1f1aab6ede49d431e9db8b74167e9cb9f0d270b69c8b988def8d",
            expected_signature: "cf4abdf25f822086d91f894f2484ce36d8331a35e97c6af9ffecef08426eb65d\
                                 0b45d24814fcf251679a874e26e3c5d5c97f6c8918319c529c54c934dba3310c",
        },
        GoldenVector {
            name: "Mint of empty content",
            owner_seed: [0x00; 32],
            recipient_seed: None,
            content: b"",
            prior_position: Position::ZERO,
            expected_transfer_id: "d11532f06953de9a5e77a22aae516d0ad4fc59c5fe3002cc9bca5ccc45a94efe",
            expected_signature: "9e25afcfdea2b04da29cad0be01674f5d48257502819140bf37666172b45279c\
                                 a5996c0baaf95007c654f690c193a3ffa5a272adb66978f69f32f1f615650202",
        },
        GoldenVector {
            name: "Transfer of hello",
            owner_seed: [0x42; 32],
            recipient_seed: Some([0x43; 32]),
            content: b"hello",
            prior_position: Position::new(BlockHash::from_bytes([0xAA; 32]), 7),
            expected_transfer_id: "dc53d5ba0d5a68af56f7359d920bca8dfa943f700773f049f342223eb8fc4ae7",
            expected_signature: "2741fb020cc571eb600723ed7dbeea89ba1b7b1566cc93c3dd5d5083def85c41\
                                 f5f62019b389ede3f5fc0d44d276b8a2f1b09e0f3bbaa58ab4c55a6ac0185909",
        },
    ]
}

/// Generate the signed record a vector describes.
///
/// For transfers the prior record is the owner's mint of the same content,
/// assumed stored at `prior_position`.
pub fn generate_record_from_vector(vector: &GoldenVector) -> AssetRecord {
    let owner = Keypair::from_seed(&vector.owner_seed);
    let mint = AssetRecordBuilder::mint_content(vector.content, owner.public_key())
        .sign(&owner)
        .expect("owner signs its own mint");

    match vector.recipient_seed {
        None => mint,
        Some(seed) => {
            let recipient = Keypair::from_seed(&seed).public_key();
            AssetRecordBuilder::transfer(vector.prior_position, &mint, recipient)
                .sign(&owner)
                .expect("owner signs the outgoing transfer")
        }
    }
}

/// Compute the exported outputs of a vector.
pub fn vector_output(vector: &GoldenVector) -> VectorOutput {
    let record = generate_record_from_vector(vector);
    VectorOutput {
        name: vector.name.to_string(),
        owner_pk: Keypair::from_seed(&vector.owner_seed).public_key().to_hex(),
        content_hash: record.content_hash.to_hex(),
        canonical_bytes: hex::encode(canonical_bytes(&record)),
        transfer_id: record.transfer_id.to_hex(),
        signed_message: hex::encode(signed_message(&record)),
        signature: record
            .signature
            .map(|s| s.to_hex())
            .unwrap_or_default(),
    }
}

/// Export every vector's outputs as pretty JSON.
pub fn export_json() -> serde_json::Result<String> {
    let outputs: Vec<VectorOutput> = all_vectors().iter().map(vector_output).collect();
    serde_json::to_string_pretty(&outputs)
}

/// Verify all golden vectors produce the expected transfer id and signature.
///
/// Returns `(name, matches, actual_transfer_id_hex)` per vector. A vector
/// with no expected values never matches.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let (matches, hex) = check_vector(v);
            (v.name.to_string(), matches, hex)
        })
        .collect()
}

/// Check one vector, returning whether it matches and the actual transfer id.
pub fn check_vector(vector: &GoldenVector) -> (bool, String) {
    let out = vector_output(vector);
    let matches = !vector.expected_transfer_id.is_empty()
        && out.transfer_id == vector.expected_transfer_id
        && out.signature == vector.expected_signature;
    (matches, out.transfer_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use custody_core::{ContentHash, CANONICAL_LEN};

    #[test]
    fn test_vectors_are_deterministic() {
        for vector in all_vectors() {
            let out1 = vector_output(&vector);
            let out2 = vector_output(&vector);

            assert_eq!(
                out1, out2,
                "Vector '{}' produced different outputs on regeneration",
                vector.name
            );
        }
    }

    #[test]
    fn test_vectors_match() {
        let results = verify_all_vectors();
        assert_eq!(results.len(), all_vectors().len());
        for (name, matches, hex) in results {
            assert!(matches, "Vector '{}' produced {}", name, hex);
        }
    }

    #[test]
    fn test_vector_inputs_pinned() {
        let mint = vector_output(&all_vectors()[0]);
        let empty = vector_output(&all_vectors()[1]);

        // RFC 8032 public key of the all-zero seed
        assert_eq!(
            empty.owner_pk,
            "3b6a27bcceb6a42d62a3a8d02a6f0d73653215771de243a63ac048a18b59da29"
        );
        // BLAKE3 of the empty string and of "hello"
        assert_eq!(
            empty.content_hash,
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );
        assert_eq!(
            mint.content_hash,
            "ea8f163db38682925e4491c5e58d4bb3506ef8c14eb78a86e908c5624a67200f"
        );
        assert_eq!(
            mint.owner_pk,
            "2152f8d19b791d24453242e15f2eab6cb7cffa7b6a5ed30097960e069881db12"
        );
    }

    #[test]
    fn test_unpinned_vector_does_not_match() {
        let mut vector = all_vectors().remove(0);
        assert!(check_vector(&vector).0);

        vector.expected_transfer_id = "";
        assert!(!check_vector(&vector).0);

        // A correct id with a wrong signature still fails
        let mut vector = all_vectors().remove(0);
        vector.expected_signature = all_vectors()[1].expected_signature;
        assert!(!check_vector(&vector).0);
    }

    #[test]
    fn test_canonical_layout() {
        let mint = generate_record_from_vector(&all_vectors()[0]);
        let transfer = generate_record_from_vector(&all_vectors()[2]);
        let mint_bytes = canonical_bytes(&mint);
        let transfer_bytes = canonical_bytes(&transfer);

        assert_eq!(mint_bytes.len(), CANONICAL_LEN);
        assert_eq!(&mint_bytes[..32], ContentHash::of(b"hello").as_bytes());
        // Mints zero-fill prev_owner
        assert!(mint_bytes[32..64].iter().all(|&b| b == 0));

        // The transfer's prev_owner is the mint's owner
        assert_eq!(&transfer_bytes[32..64], mint.owner.as_bytes());
        assert_eq!(&transfer_bytes[96..128], mint.creator.as_bytes());
    }

    #[test]
    fn test_signed_message_shapes() {
        let mint = vector_output(&all_vectors()[0]);
        let transfer = vector_output(&all_vectors()[2]);

        // Mints sign the transfer id only
        assert_eq!(mint.signed_message, mint.transfer_id);
        // Transfers sign canonical bytes followed by the transfer id
        assert_eq!(
            transfer.signed_message,
            format!("{}{}", transfer.canonical_bytes, transfer.transfer_id)
        );
    }

    #[test]
    fn test_export_json() {
        let json = export_json().unwrap();
        let parsed: Vec<VectorOutput> = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.len(), all_vectors().len());
        assert_eq!(parsed[0].name, "Mint of hello");
        assert_eq!(parsed[0].signature.len(), 128);
    }

    #[test]
    fn test_different_seeds_different_ids() {
        let v1 = GoldenVector {
            name: "seed1",
            owner_seed: [0x01; 32],
            recipient_seed: None,
            content: b"same",
            prior_position: Position::ZERO,
            expected_transfer_id: "",
            expected_signature: "",
        };
        let v2 = GoldenVector {
            owner_seed: [0x02; 32],
            name: "seed2",
            ..v1.clone()
        };

        let r1 = generate_record_from_vector(&v1);
        let r2 = generate_record_from_vector(&v2);

        assert_ne!(r1.transfer_id, r2.transfer_id);
    }
}
