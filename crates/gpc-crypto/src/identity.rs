//! # Owner Identity — Commitments and Nullifiers
//!
//! The owner module binds one POD entry to a private identity. The
//! identity consists of two secret field elements (nullifier and
//! trapdoor); the value stored in the POD entry is the identity
//! commitment, a double hash of the secrets. A proof may reveal a
//! nullifier hash: a fixed 2-ary hash of the external-nullifier signal
//! and the nullifier secret, which pins the identity to one context
//! without revealing it.
//!
//! ## Security Invariant
//!
//! Secrets never serialize. `OwnerIdentity` does not implement
//! `Serialize`, and its `Debug` output is redacted.

use gpc_core::field_modulus;
use num_bigint::BigUint;
use rand::RngCore;

use crate::field_hash::hash_fields;

/// Domain tag for the inner secret hash.
const DOMAIN_IDENTITY_SECRET: &str = "gpc.identity.secret.v1";
/// Domain tag for the identity commitment.
const DOMAIN_IDENTITY_COMMITMENT: &str = "gpc.identity.commitment.v1";
/// Domain tag for nullifier hashes.
const DOMAIN_NULLIFIER: &str = "gpc.nullifier.v1";

/// An owner's identity secrets.
#[derive(Clone, PartialEq, Eq)]
pub struct OwnerIdentity {
    nullifier: BigUint,
    trapdoor: BigUint,
}

impl OwnerIdentity {
    /// Construct an identity from explicit secrets, reducing each into the
    /// field.
    pub fn from_secrets(nullifier: BigUint, trapdoor: BigUint) -> Self {
        Self {
            nullifier: nullifier % field_modulus(),
            trapdoor: trapdoor % field_modulus(),
        }
    }

    /// Generate a random identity.
    pub fn random() -> Self {
        Self::from_secrets(random_field_element(), random_field_element())
    }

    /// The nullifier secret.
    pub fn nullifier(&self) -> &BigUint {
        &self.nullifier
    }

    /// The trapdoor secret.
    pub fn trapdoor(&self) -> &BigUint {
        &self.trapdoor
    }

    /// The identity commitment: the public value an owner entry carries.
    ///
    /// `commitment = H(H(nullifier, trapdoor))`, with distinct domains for
    /// the inner secret and the outer commitment.
    pub fn commitment(&self) -> BigUint {
        let secret = hash_fields(
            DOMAIN_IDENTITY_SECRET,
            &[self.nullifier.clone(), self.trapdoor.clone()],
        );
        hash_fields(DOMAIN_IDENTITY_COMMITMENT, &[secret])
    }
}

impl std::fmt::Debug for OwnerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OwnerIdentity(<secret>)")
    }
}

/// The revealed nullifier hash: a fixed 2-ary hash over the
/// external-nullifier signal and the nullifier secret.
pub fn nullifier_hash(external_nullifier_signal: &BigUint, nullifier_secret: &BigUint) -> BigUint {
    hash_fields(
        DOMAIN_NULLIFIER,
        &[
            external_nullifier_signal.clone(),
            nullifier_secret.clone(),
        ],
    )
}

fn random_field_element() -> BigUint {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    BigUint::from_bytes_be(&bytes) % field_modulus()
}
