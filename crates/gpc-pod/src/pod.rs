//! # POD — Signed, Merkle-Committed Objects
//!
//! A POD is an ordered mapping from entry names to tagged values, a
//! Merkle commitment over those entries (the content ID), and an Ed25519
//! signature over the commitment. The entry order is the sorted name
//! order; the commitment's leaf sequence interleaves each entry's name
//! hash and value hash, so an inclusion proof for a name leaf carries the
//! value hash as its first sibling. That layout is exactly what the
//! circuit's entry module consumes.
//!
//! PODs are immutable once signed. Construction either signs a fresh
//! entry map or adopts wire data, and [`Pod::verify`] re-derives the
//! commitment and checks the signature.

use std::collections::BTreeMap;

use gpc_core::error::CryptoError;
use gpc_core::{CanonicalBytes, CanonicalizationError, PodName};
use gpc_crypto::ed25519::{self, PodSignature, SignerPublicKey, SigningKeypair};
use gpc_crypto::field_hash::entry_name_hash;
use gpc_crypto::merkle::{MerkleEntryProof, MerkleTree};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::{PodValue, PodValueError};

/// Error constructing or using a POD.
#[derive(Error, Debug)]
pub enum PodError {
    /// A POD must hold at least one entry.
    #[error("a POD must contain at least one entry")]
    EmptyEntries,

    /// A named entry does not exist in this POD.
    #[error("entry {0:?} does not exist in POD")]
    MissingEntry(String),

    /// An entry value failed validation.
    #[error("invalid value for entry {name}: {source}")]
    InvalidValue {
        /// The offending entry name.
        name: String,
        /// The underlying value error.
        source: PodValueError,
    },

    /// The stored content ID does not match the entries.
    #[error("content ID does not match entry commitment")]
    ContentIdMismatch,

    /// Canonical serialization of the signing payload failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A cryptographic operation failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

/// The canonical byte payload a POD signature covers: the content ID
/// rendered as a decimal string, canonically serialized.
pub fn signing_payload(content_id: &BigUint) -> Result<CanonicalBytes, CanonicalizationError> {
    CanonicalBytes::new(&content_id.to_str_radix(10))
}

/// A signed, Merkle-committed key/value object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    entries: BTreeMap<PodName, PodValue>,
    #[serde(with = "gpc_core::field::dec_string")]
    content_id: BigUint,
    signature: PodSignature,
    signer_public_key: SignerPublicKey,
}

impl Pod {
    /// Sign an entry map, producing an immutable POD.
    pub fn sign(
        entries: BTreeMap<PodName, PodValue>,
        keypair: &SigningKeypair,
    ) -> Result<Self, PodError> {
        validate_entries(&entries)?;
        let tree = entry_tree(&entries)?;
        let content_id = tree.root().clone();
        let signature = keypair.sign(&signing_payload(&content_id)?);
        Ok(Self {
            entries,
            content_id,
            signature,
            signer_public_key: keypair.public_key(),
        })
    }

    /// Re-derive the commitment and check the signature. Wire-deserialized
    /// PODs should be verified before use.
    pub fn verify(&self) -> Result<(), PodError> {
        validate_entries(&self.entries)?;
        let tree = entry_tree(&self.entries)?;
        if tree.root() != &self.content_id {
            return Err(PodError::ContentIdMismatch);
        }
        ed25519::verify(
            &signing_payload(&self.content_id)?,
            &self.signature,
            &self.signer_public_key,
        )?;
        Ok(())
    }

    /// The entry map, in sorted name order.
    pub fn entries(&self) -> &BTreeMap<PodName, PodValue> {
        &self.entries
    }

    /// Look up one entry value.
    pub fn get(&self, name: &PodName) -> Option<&PodValue> {
        self.entries.get(name)
    }

    /// The Merkle root committing to all entries.
    pub fn content_id(&self) -> &BigUint {
        &self.content_id
    }

    /// The signature over the content ID.
    pub fn signature(&self) -> &PodSignature {
        &self.signature
    }

    /// The signer's public key.
    pub fn signer_public_key(&self) -> &SignerPublicKey {
        &self.signer_public_key
    }

    /// The proof depth shared by all entry proofs of this POD.
    pub fn merkle_depth(&self) -> usize {
        // 2 leaves per entry, padded to a power of two.
        (self.entries.len() * 2).next_power_of_two().max(2).ilog2() as usize
    }

    /// Inclusion proof for a named entry.
    ///
    /// The proof covers the entry's name-hash leaf; the value hash is the
    /// proof's first sibling, which is how the circuit recovers it.
    pub fn entry_proof(&self, name: &PodName) -> Result<MerkleEntryProof, PodError> {
        let position = self
            .entries
            .keys()
            .position(|k| k == name)
            .ok_or_else(|| PodError::MissingEntry(name.to_string()))?;
        let tree = entry_tree(&self.entries)?;
        Ok(tree.prove(position * 2)?)
    }
}

fn validate_entries(entries: &BTreeMap<PodName, PodValue>) -> Result<(), PodError> {
    if entries.is_empty() {
        return Err(PodError::EmptyEntries);
    }
    for (name, value) in entries {
        value.validate().map_err(|source| PodError::InvalidValue {
            name: name.to_string(),
            source,
        })?;
    }
    Ok(())
}

/// Build the commitment tree: leaves interleave name hash and value hash
/// in sorted name order.
fn entry_tree(entries: &BTreeMap<PodName, PodValue>) -> Result<MerkleTree, PodError> {
    let mut leaves = Vec::with_capacity(entries.len() * 2);
    for (name, value) in entries {
        leaves.push(entry_name_hash(name.as_str()));
        leaves.push(value.content_hash());
    }
    Ok(MerkleTree::new(&leaves)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpc_crypto::merkle::verify_entry_proof;

    fn sample_entries() -> BTreeMap<PodName, PodValue> {
        let mut entries = BTreeMap::new();
        entries.insert(
            PodName::new("ticketID").unwrap(),
            PodValue::cryptographic(BigUint::from(999u32)).unwrap(),
        );
        entries.insert(PodName::new("eventID").unwrap(), PodValue::Int(456));
        entries.insert(
            PodName::new("attendeeName").unwrap(),
            PodValue::String("Amelia".to_string()),
        );
        entries
    }

    fn keypair() -> SigningKeypair {
        SigningKeypair::from_seed(&[3u8; 32])
    }

    #[test]
    fn test_sign_and_verify_roundtrip() {
        let pod = Pod::sign(sample_entries(), &keypair()).unwrap();
        pod.verify().expect("freshly signed POD should verify");
    }

    #[test]
    fn test_empty_entries_rejected() {
        assert!(matches!(
            Pod::sign(BTreeMap::new(), &keypair()),
            Err(PodError::EmptyEntries)
        ));
    }

    #[test]
    fn test_content_id_is_stable() {
        let pod1 = Pod::sign(sample_entries(), &keypair()).unwrap();
        let pod2 = Pod::sign(sample_entries(), &keypair()).unwrap();
        assert_eq!(pod1.content_id(), pod2.content_id());
    }

    #[test]
    fn test_content_id_changes_with_value() {
        let pod1 = Pod::sign(sample_entries(), &keypair()).unwrap();
        let mut entries = sample_entries();
        entries.insert(PodName::new("eventID").unwrap(), PodValue::Int(457));
        let pod2 = Pod::sign(entries, &keypair()).unwrap();
        assert_ne!(pod1.content_id(), pod2.content_id());
    }

    #[test]
    fn test_every_entry_proof_verifies() {
        let pod = Pod::sign(sample_entries(), &keypair()).unwrap();
        for (name, value) in pod.entries() {
            let proof = pod.entry_proof(name).unwrap();
            assert_eq!(proof.depth, pod.merkle_depth());
            assert!(verify_entry_proof(
                pod.content_id(),
                &entry_name_hash(name.as_str()),
                &proof
            ));
            // The value hash rides along as the first sibling.
            assert_eq!(proof.siblings[0], value.content_hash());
            // Name leaves sit at even indices.
            assert_eq!(proof.index % 2, 0);
        }
    }

    #[test]
    fn test_missing_entry_proof_fails() {
        let pod = Pod::sign(sample_entries(), &keypair()).unwrap();
        let missing = PodName::new("nope").unwrap();
        assert!(matches!(
            pod.entry_proof(&missing),
            Err(PodError::MissingEntry(_))
        ));
    }

    #[test]
    fn test_merkle_depth_matches_entry_count() {
        let pod = Pod::sign(sample_entries(), &keypair()).unwrap();
        // 3 entries -> 6 leaves -> padded to 8 -> depth 3.
        assert_eq!(pod.merkle_depth(), 3);
    }

    #[test]
    fn test_tampered_entry_fails_verify() {
        let pod = Pod::sign(sample_entries(), &keypair()).unwrap();
        let json = serde_json::to_string(&pod).unwrap();
        let tampered = json.replace("456", "789");
        let bad: Pod = serde_json::from_str(&tampered).unwrap();
        assert!(bad.verify().is_err());
    }

    #[test]
    fn test_serde_roundtrip_preserves_verification() {
        let pod = Pod::sign(sample_entries(), &keypair()).unwrap();
        let json = serde_json::to_string(&pod).unwrap();
        let back: Pod = serde_json::from_str(&json).unwrap();
        back.verify().expect("round-tripped POD should verify");
        assert_eq!(back.content_id(), pod.content_id());
    }

    #[test]
    fn test_wire_uses_camel_case() {
        let pod = Pod::sign(sample_entries(), &keypair()).unwrap();
        let json = serde_json::to_string(&pod).unwrap();
        assert!(json.contains("\"contentId\""));
        assert!(json.contains("\"signerPublicKey\""));
    }
}
