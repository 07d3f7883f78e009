//! # gpc-crypto — Cryptographic Primitives
//!
//! The cryptography the POD GPC stack is built on:
//!
//! - [`ed25519`]: POD signing keys, signatures, and the limb encoding that
//!   carries them into circuit signals.
//! - [`field_hash`]: the domain-separated hash-to-field used for entry
//!   names, values, Merkle nodes, tuples, and nullifiers.
//! - [`merkle`]: the complete binary Merkle tree behind every POD content
//!   commitment, with per-leaf inclusion proofs.
//! - [`identity`]: owner identities (nullifier/trapdoor secrets) and the
//!   commitment and nullifier-hash computations the owner module proves.

pub mod ed25519;
pub mod field_hash;
pub mod identity;
pub mod merkle;

pub use ed25519::{PodSignature, SignerPublicKey, SigningKeypair};
pub use identity::OwnerIdentity;
pub use merkle::{MerkleEntryProof, MerkleTree};
