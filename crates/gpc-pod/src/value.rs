//! # POD Values — Tagged Entry Values
//!
//! A POD entry holds one of three tagged value kinds: a signed 64-bit
//! integer, an unsigned field-sized "cryptographic" integer, or a UTF-8
//! string. Each kind has a stable content hash, which is what Merkle
//! trees commit to and what every circuit constraint compares.
//!
//! ## Wire Format
//!
//! Values serialize as `{"type": ..., "value": ...}` objects: ints as
//! JSON numbers, cryptographic values as decimal strings (they exceed
//! JSON number precision), strings as strings.

use std::str::FromStr;

use gpc_core::field::{field_modulus, i64_to_field};
use gpc_crypto::field_hash::{numeric_value_hash, string_value_hash};
use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Smallest value an int entry may hold.
pub const POD_INT_MIN: i64 = i64::MIN;
/// Largest value an int entry may hold.
pub const POD_INT_MAX: i64 = i64::MAX;

/// Error for a malformed POD value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PodValueError {
    /// A cryptographic value at or above the field modulus.
    #[error("cryptographic value {0} is not below the field modulus")]
    CryptographicOutOfRange(String),

    /// A wire value whose `type` tag is not recognized.
    #[error("unknown value type {0:?}")]
    UnknownType(String),

    /// A wire value whose payload does not match its tag.
    #[error("malformed {kind} value: {reason}")]
    MalformedValue {
        /// The tagged kind that failed to parse.
        kind: &'static str,
        /// Why the payload was rejected.
        reason: String,
    },
}

/// A tagged POD entry value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PodValue {
    /// A signed 64-bit integer.
    Int(i64),
    /// An unsigned integer below the field modulus.
    Cryptographic(BigUint),
    /// A UTF-8 string.
    String(String),
}

impl PodValue {
    /// Construct a cryptographic value, checking the field bound.
    pub fn cryptographic(value: BigUint) -> Result<Self, PodValueError> {
        if &value >= field_modulus() {
            return Err(PodValueError::CryptographicOutOfRange(
                value.to_str_radix(10),
            ));
        }
        Ok(Self::Cryptographic(value))
    }

    /// The stable content hash committed to by Merkle trees and compared
    /// by every circuit constraint.
    ///
    /// Int and cryptographic values share the numeric hash domain, so an
    /// equality constraint across the two kinds is satisfiable when the
    /// numbers agree.
    pub fn content_hash(&self) -> BigUint {
        match self {
            Self::Int(v) => numeric_value_hash(&i64_to_field(*v)),
            Self::Cryptographic(v) => numeric_value_hash(v),
            Self::String(s) => string_value_hash(s),
        }
    }

    /// Check well-formedness of a value that may have arrived over the
    /// wire. Int and string values are well-formed by construction;
    /// cryptographic values must lie below the field modulus.
    pub fn validate(&self) -> Result<(), PodValueError> {
        match self {
            Self::Cryptographic(v) if v >= field_modulus() => Err(
                PodValueError::CryptographicOutOfRange(v.to_str_radix(10)),
            ),
            _ => Ok(()),
        }
    }

    /// The int payload, if this is an int value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The name of this value's kind, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Cryptographic(_) => "cryptographic",
            Self::String(_) => "string",
        }
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
enum WireValue {
    Int(i64),
    Cryptographic(String),
    String(String),
}

impl Serialize for PodValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match self {
            Self::Int(v) => WireValue::Int(*v),
            Self::Cryptographic(v) => WireValue::Cryptographic(v.to_str_radix(10)),
            Self::String(s) => WireValue::String(s.clone()),
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PodValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireValue::deserialize(deserializer)?;
        let value = match wire {
            WireValue::Int(v) => Self::Int(v),
            WireValue::Cryptographic(s) => {
                let v = BigUint::from_str(&s).map_err(|e| {
                    serde::de::Error::custom(PodValueError::MalformedValue {
                        kind: "cryptographic",
                        reason: e.to_string(),
                    })
                })?;
                Self::cryptographic(v).map_err(serde::de::Error::custom)?
            }
            WireValue::String(s) => Self::String(s),
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;

    #[test]
    fn test_int_hash_matches_cryptographic_hash() {
        let int = PodValue::Int(999);
        let crypt = PodValue::cryptographic(BigUint::from(999u32)).unwrap();
        assert_eq!(int.content_hash(), crypt.content_hash());
    }

    #[test]
    fn test_negative_int_hash_uses_field_residue() {
        let neg = PodValue::Int(-5);
        let residue = PodValue::cryptographic(field_modulus() - 5u8).unwrap();
        assert_eq!(neg.content_hash(), residue.content_hash());
    }

    #[test]
    fn test_string_and_numeric_never_collide() {
        assert_ne!(
            PodValue::String("7".to_string()).content_hash(),
            PodValue::Int(7).content_hash()
        );
    }

    #[test]
    fn test_cryptographic_bound_enforced() {
        assert!(PodValue::cryptographic(field_modulus().clone()).is_err());
        assert!(PodValue::cryptographic(field_modulus() - 1u8).is_ok());
        assert!(PodValue::cryptographic(BigUint::zero()).is_ok());
    }

    #[test]
    fn test_wire_format_int() {
        let json = serde_json::to_string(&PodValue::Int(123)).unwrap();
        assert_eq!(json, r#"{"type":"int","value":123}"#);
        let back: PodValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PodValue::Int(123));
    }

    #[test]
    fn test_wire_format_cryptographic() {
        let v = PodValue::cryptographic(BigUint::from(999u32)).unwrap();
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"{"type":"cryptographic","value":"999"}"#);
        let back: PodValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn test_wire_format_string() {
        let v = PodValue::String("hello".to_string());
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"{"type":"string","value":"hello"}"#);
        let back: PodValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn test_wire_rejects_oversized_cryptographic() {
        let too_big = field_modulus().to_str_radix(10);
        let json = format!(r#"{{"type":"cryptographic","value":"{too_big}"}}"#);
        assert!(serde_json::from_str::<PodValue>(&json).is_err());
    }

    #[test]
    fn test_wire_rejects_unknown_type() {
        let json = r#"{"type":"float","value":1}"#;
        assert!(serde_json::from_str::<PodValue>(&json).is_err());
    }

    #[test]
    fn test_int_extremes_roundtrip() {
        for v in [POD_INT_MIN, -1, 0, 1, POD_INT_MAX] {
            let json = serde_json::to_string(&PodValue::Int(v)).unwrap();
            let back: PodValue = serde_json::from_str(&json).unwrap();
            assert_eq!(back, PodValue::Int(v));
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Content hashes are deterministic and well-typed for all ints.
        #[test]
        fn int_hash_stable(v in any::<i64>()) {
            let a = PodValue::Int(v).content_hash();
            let b = PodValue::Int(v).content_hash();
            prop_assert_eq!(&a, &b);
            prop_assert!(&a < field_modulus());
        }

        /// The wire format round-trips every string value.
        #[test]
        fn string_roundtrip(s in ".{0,60}") {
            let v = PodValue::String(s);
            let json = serde_json::to_string(&v).unwrap();
            let back: PodValue = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back, v);
        }
    }
}
