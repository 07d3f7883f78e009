//! # Field Hash — Domain-Separated Hash-to-Field
//!
//! Every commitment inside the GPC layer (entry names, entry values,
//! Merkle nodes, tuples, nullifiers) is a field element produced by one
//! hash construction: SHA-256 over a domain tag and fixed-width operand
//! encoding, reduced into the circuit field. The arithmetic-native hash
//! slot is reserved for a later backend phase; what matters at this layer
//! is that the function is pinned, deterministic, and shared by the prove
//! and verify paths.
//!
//! ## Security Invariant
//!
//! Domain tags separate every use. Two different kinds of data can never
//! collide by encoding alike: a string value hash and an entry name hash
//! of the same UTF-8 bytes are distinct field elements.

use gpc_core::field_modulus;
use num_bigint::BigUint;
use sha2::{Digest, Sha256};

/// Domain tag for numeric (int and cryptographic) value hashes.
///
/// Int and cryptographic values share a domain so an equality constraint
/// between an int entry and a cryptographic entry holding the same number
/// is satisfiable, matching the family's comparison semantics.
pub const DOMAIN_VALUE_NUMERIC: &str = "gpc.value.numeric.v1";
/// Domain tag for string value hashes.
pub const DOMAIN_VALUE_STRING: &str = "gpc.value.string.v1";
/// Domain tag for entry name hashes.
pub const DOMAIN_ENTRY_NAME: &str = "gpc.entry.name.v1";
/// Domain tag for signer-public-key (virtual entry) value hashes.
pub const DOMAIN_PUBLIC_KEY: &str = "gpc.signer.pubkey.v1";
/// Domain tag for Merkle interior nodes.
pub const DOMAIN_MERKLE_NODE: &str = "gpc.merkle.node.v1";
/// Domain tag for tuple hashes (each chain link).
pub const DOMAIN_TUPLE: &str = "gpc.tuple.v1";

/// Hash a sequence of field elements into one field element.
///
/// Operands are encoded big-endian in 32 bytes each, length-prefixed, so
/// distinct operand sequences have distinct encodings.
pub fn hash_fields(domain: &str, inputs: &[BigUint]) -> BigUint {
    let mut hasher = Sha256::new();
    hasher.update(domain.as_bytes());
    hasher.update((inputs.len() as u32).to_be_bytes());
    for input in inputs {
        hasher.update(to_fixed_32(input));
    }
    reduce(hasher.finalize().as_slice())
}

/// Hash arbitrary bytes into a field element.
pub fn hash_bytes(domain: &str, bytes: &[u8]) -> BigUint {
    let mut hasher = Sha256::new();
    hasher.update(domain.as_bytes());
    hasher.update((bytes.len() as u64).to_be_bytes());
    hasher.update(bytes);
    reduce(hasher.finalize().as_slice())
}

/// Content hash of an entry name.
pub fn entry_name_hash(name: &str) -> BigUint {
    hash_bytes(DOMAIN_ENTRY_NAME, name.as_bytes())
}

/// Content hash of a string value.
pub fn string_value_hash(value: &str) -> BigUint {
    hash_bytes(DOMAIN_VALUE_STRING, value.as_bytes())
}

/// Content hash of a numeric value already reduced into the field.
pub fn numeric_value_hash(value: &BigUint) -> BigUint {
    hash_fields(DOMAIN_VALUE_NUMERIC, std::slice::from_ref(value))
}

/// Content hash of a signer public key, the value of the virtual entry
/// every object carries.
pub fn public_key_hash(key_bytes: &[u8; 32]) -> BigUint {
    hash_bytes(DOMAIN_PUBLIC_KEY, key_bytes)
}

/// Merkle interior node hash.
pub fn merkle_node_hash(left: &BigUint, right: &BigUint) -> BigUint {
    hash_fields(DOMAIN_MERKLE_NODE, &[left.clone(), right.clone()])
}

/// One tuple chain link over already-hashed members.
pub fn tuple_hash(members: &[BigUint]) -> BigUint {
    hash_fields(DOMAIN_TUPLE, members)
}

fn to_fixed_32(value: &BigUint) -> [u8; 32] {
    let bytes = value.to_bytes_be();
    debug_assert!(bytes.len() <= 32, "field element exceeds 32 bytes");
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}

fn reduce(digest: &[u8]) -> BigUint {
    BigUint::from_bytes_be(digest) % field_modulus()
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;

    #[test]
    fn test_hash_is_deterministic() {
        let a = hash_fields(DOMAIN_TUPLE, &[BigUint::from(1u8), BigUint::from(2u8)]);
        let b = hash_fields(DOMAIN_TUPLE, &[BigUint::from(1u8), BigUint::from(2u8)]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_in_field_range() {
        let h = hash_bytes(DOMAIN_VALUE_STRING, b"hello");
        assert!(&h < field_modulus());
    }

    #[test]
    fn test_domains_separate() {
        let name = entry_name_hash("ticketID");
        let string = string_value_hash("ticketID");
        assert_ne!(name, string);
    }

    #[test]
    fn test_operand_order_matters() {
        let ab = merkle_node_hash(&BigUint::from(1u8), &BigUint::from(2u8));
        let ba = merkle_node_hash(&BigUint::from(2u8), &BigUint::from(1u8));
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_length_prefix_separates_operand_splits() {
        // [1, 0] and [1] must not collide even though 0 encodes as zeros.
        let two = hash_fields(DOMAIN_TUPLE, &[BigUint::from(1u8), BigUint::zero()]);
        let one = hash_fields(DOMAIN_TUPLE, &[BigUint::from(1u8)]);
        assert_ne!(two, one);
    }

    #[test]
    fn test_int_and_cryptographic_share_numeric_domain() {
        // The same number hashes identically regardless of which tagged
        // type carried it; equality constraints rely on this.
        let v = BigUint::from(999u32);
        assert_eq!(numeric_value_hash(&v), numeric_value_hash(&v));
    }

    #[test]
    fn test_distinct_values_distinct_hashes() {
        assert_ne!(
            numeric_value_hash(&BigUint::from(1u8)),
            numeric_value_hash(&BigUint::from(2u8))
        );
        assert_ne!(string_value_hash("a"), string_value_hash("b"));
    }
}
