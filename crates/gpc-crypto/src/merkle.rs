//! # Merkle Tree — POD Content Commitments
//!
//! The complete binary Merkle tree behind every POD content ID. Leaves are
//! field elements (entry name and value hashes, interleaved by the POD
//! layer); the leaf level is padded with zero elements to the next power
//! of two, so every leaf's inclusion proof has the same depth and the
//! direction bits of a proof are exactly the binary digits of the leaf
//! index.
//!
//! ## Invariants
//!
//! - The root is a pure function of the leaf sequence.
//! - `depth == log2(padded leaf count)`; every proof carries `depth`
//!   siblings.
//! - `verify_entry_proof(root, leaf, proof)` recomputes the root by
//!   folding siblings along the index bits, the same computation the
//!   circuit's entry module performs.

use gpc_core::error::CryptoError;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::field_hash::merkle_node_hash;

/// A Merkle inclusion proof for one leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleEntryProof {
    /// Number of tree levels between leaf and root; equals `siblings.len()`.
    pub depth: usize,
    /// The leaf's index in the padded leaf level. Its binary digits, least
    /// significant first, are the proof's direction bits.
    pub index: u64,
    /// Sibling hashes from leaf level upward.
    #[serde(with = "dec_vec")]
    pub siblings: Vec<BigUint>,
}

/// A complete binary Merkle tree over field-element leaves.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    /// levels[0] is the padded leaf level; the last level holds the root.
    levels: Vec<Vec<BigUint>>,
}

impl MerkleTree {
    /// Build a tree over the given leaves.
    ///
    /// The leaf sequence is padded with zero elements to the next power of
    /// two (minimum two leaves), so the tree shape depends only on the
    /// leaf count.
    pub fn new(leaves: &[BigUint]) -> Result<Self, CryptoError> {
        if leaves.is_empty() {
            return Err(CryptoError::MerkleError(
                "cannot build a tree over zero leaves".to_string(),
            ));
        }
        let width = leaves.len().next_power_of_two().max(2);
        let mut level: Vec<BigUint> = leaves.to_vec();
        level.resize(width, BigUint::zero());

        let mut levels = vec![level];
        while levels.last().map(Vec::len).unwrap_or(0) > 1 {
            let prev = levels.last().expect("at least one level");
            let next: Vec<BigUint> = prev
                .chunks(2)
                .map(|pair| merkle_node_hash(&pair[0], &pair[1]))
                .collect();
            levels.push(next);
        }
        Ok(Self { levels })
    }

    /// The tree root (the POD content ID).
    pub fn root(&self) -> &BigUint {
        &self.levels.last().expect("root level exists")[0]
    }

    /// Number of levels between leaf and root.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Inclusion proof for the leaf at `index`.
    pub fn prove(&self, index: usize) -> Result<MerkleEntryProof, CryptoError> {
        if index >= self.levels[0].len() {
            return Err(CryptoError::MerkleError(format!(
                "leaf index {index} out of range for {} leaves",
                self.levels[0].len()
            )));
        }
        let mut siblings = Vec::with_capacity(self.depth());
        let mut idx = index;
        for level in &self.levels[..self.levels.len() - 1] {
            siblings.push(level[idx ^ 1].clone());
            idx >>= 1;
        }
        Ok(MerkleEntryProof {
            depth: self.depth(),
            index: index as u64,
            siblings,
        })
    }
}

/// Recompute the root from a leaf and its proof, checking it against an
/// expected root. This is the fold the circuit's entry module performs.
pub fn verify_entry_proof(root: &BigUint, leaf: &BigUint, proof: &MerkleEntryProof) -> bool {
    if proof.siblings.len() != proof.depth {
        return false;
    }
    let mut current = leaf.clone();
    for (level, sibling) in proof.siblings.iter().enumerate() {
        let bit = (proof.index >> level) & 1;
        current = if bit == 1 {
            merkle_node_hash(sibling, &current)
        } else {
            merkle_node_hash(&current, sibling)
        };
    }
    &current == root
}

/// Serde helpers for vectors of field elements as decimal strings.
mod dec_vec {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(values: &[BigUint], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|v| v.to_str_radix(10)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<BigUint>, D::Error> {
        let strings = Vec::<String>::deserialize(deserializer)?;
        strings
            .iter()
            .map(|s| {
                BigUint::from_str(s)
                    .map_err(|e| serde::de::Error::custom(format!("invalid decimal string: {e}")))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaves(n: u32) -> Vec<BigUint> {
        (1..=n).map(|i| BigUint::from(i * 17 + 3)).collect()
    }

    #[test]
    fn test_empty_rejected() {
        assert!(MerkleTree::new(&[]).is_err());
    }

    #[test]
    fn test_single_leaf_pads_to_two() {
        let tree = MerkleTree::new(&leaves(1)).unwrap();
        assert_eq!(tree.depth(), 1);
        let proof = tree.prove(0).unwrap();
        assert!(verify_entry_proof(tree.root(), &leaves(1)[0], &proof));
    }

    #[test]
    fn test_depth_follows_padded_width() {
        assert_eq!(MerkleTree::new(&leaves(2)).unwrap().depth(), 1);
        assert_eq!(MerkleTree::new(&leaves(3)).unwrap().depth(), 2);
        assert_eq!(MerkleTree::new(&leaves(4)).unwrap().depth(), 2);
        assert_eq!(MerkleTree::new(&leaves(5)).unwrap().depth(), 3);
        assert_eq!(MerkleTree::new(&leaves(16)).unwrap().depth(), 4);
        assert_eq!(MerkleTree::new(&leaves(17)).unwrap().depth(), 5);
    }

    #[test]
    fn test_every_leaf_proves() {
        let ls = leaves(12);
        let tree = MerkleTree::new(&ls).unwrap();
        for (i, leaf) in ls.iter().enumerate() {
            let proof = tree.prove(i).unwrap();
            assert_eq!(proof.depth, tree.depth());
            assert_eq!(proof.siblings.len(), tree.depth());
            assert!(
                verify_entry_proof(tree.root(), leaf, &proof),
                "leaf {i} should verify"
            );
        }
    }

    #[test]
    fn test_padding_leaves_prove_as_zero() {
        let ls = leaves(5);
        let tree = MerkleTree::new(&ls).unwrap();
        let proof = tree.prove(7).unwrap();
        assert!(verify_entry_proof(
            tree.root(),
            &num_traits::Zero::zero(),
            &proof
        ));
    }

    #[test]
    fn test_wrong_leaf_fails() {
        let ls = leaves(8);
        let tree = MerkleTree::new(&ls).unwrap();
        let proof = tree.prove(3).unwrap();
        assert!(!verify_entry_proof(tree.root(), &ls[4], &proof));
    }

    #[test]
    fn test_wrong_index_fails() {
        let ls = leaves(8);
        let tree = MerkleTree::new(&ls).unwrap();
        let mut proof = tree.prove(3).unwrap();
        proof.index = 5;
        assert!(!verify_entry_proof(tree.root(), &ls[3], &proof));
    }

    #[test]
    fn test_tampered_sibling_fails() {
        let ls = leaves(8);
        let tree = MerkleTree::new(&ls).unwrap();
        let mut proof = tree.prove(2).unwrap();
        proof.siblings[1] += 1u8;
        assert!(!verify_entry_proof(tree.root(), &ls[2], &proof));
    }

    #[test]
    fn test_depth_mismatch_fails() {
        let ls = leaves(8);
        let tree = MerkleTree::new(&ls).unwrap();
        let mut proof = tree.prove(2).unwrap();
        proof.depth = 2;
        assert!(!verify_entry_proof(tree.root(), &ls[2], &proof));
    }

    #[test]
    fn test_root_depends_on_leaf_order() {
        let mut ls = leaves(6);
        let root1 = MerkleTree::new(&ls).unwrap().root().clone();
        ls.swap(0, 1);
        let root2 = MerkleTree::new(&ls).unwrap().root().clone();
        assert_ne!(root1, root2);
    }

    #[test]
    fn test_proof_serde_roundtrip() {
        let ls = leaves(4);
        let tree = MerkleTree::new(&ls).unwrap();
        let proof = tree.prove(1).unwrap();
        let json = serde_json::to_string(&proof).unwrap();
        let back: MerkleEntryProof = serde_json::from_str(&json).unwrap();
        assert_eq!(proof, back);
    }
}
