//! # Field Arithmetic — Modulus and Residue Normalization
//!
//! The GPC circuit family is defined over the scalar field of the BN254
//! curve. Every circuit signal is an element of this field, and the prover
//! always emits public signals as their least non-negative residue. The
//! verify path reconstructs signals from claims, so both sides must
//! normalize signed values through the exact same function or the signal
//! vectors disagree bit-for-bit.
//!
//! [`zero_residue_mod`] is that function. It is deliberately a standalone
//! pure function with its own boundary tests rather than an inline
//! expression at each call site.

use std::str::FromStr;
use std::sync::OnceLock;

use num_bigint::{BigInt, BigUint, Sign};

/// Decimal representation of the BN254 scalar field modulus.
const FIELD_MODULUS_DEC: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

/// The field modulus all circuit signals are reduced into.
pub fn field_modulus() -> &'static BigUint {
    static MODULUS: OnceLock<BigUint> = OnceLock::new();
    MODULUS.get_or_init(|| {
        BigUint::from_str(FIELD_MODULUS_DEC).expect("modulus constant parses")
    })
}

/// The field element `modulus - 1`, used as the disabled-slot sentinel in
/// index signals (owner absent, unused list slot) and as the hidden-value
/// marker in revealed-hash outputs.
pub fn field_neg_one() -> &'static BigUint {
    static NEG_ONE: OnceLock<BigUint> = OnceLock::new();
    NEG_ONE.get_or_init(|| field_modulus() - 1u8)
}

/// Map a signed integer to its least non-negative residue modulo `modulus`.
///
/// This is the single normalization point for signed values entering the
/// public signal vector (numeric bounds in particular). The result always
/// lies in `[0, modulus)`:
///
/// - non-negative values below the modulus map to themselves,
/// - negative values map to `modulus - |value| mod modulus`,
/// - values at or above the modulus wrap.
pub fn zero_residue_mod(value: &BigInt, modulus: &BigUint) -> BigUint {
    let m = BigInt::from_biguint(Sign::Plus, modulus.clone());
    let r = ((value % &m) + &m) % &m;
    r.to_biguint().expect("residue is non-negative")
}

/// Convenience: zero-residue of an `i64` against the circuit field modulus.
pub fn i64_to_field(value: i64) -> BigUint {
    zero_residue_mod(&BigInt::from(value), field_modulus())
}

/// Serde helpers rendering `BigUint` as a decimal string.
///
/// Field-sized values do not fit in JSON numbers, and the original wire
/// format for this data is decimal strings. Used with
/// `#[serde(with = "gpc_core::field::dec_string")]`.
pub mod dec_string {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let s = String::deserialize(deserializer)?;
        BigUint::from_str(&s)
            .map_err(|e| serde::de::Error::custom(format!("invalid decimal string: {e}")))
    }
}
