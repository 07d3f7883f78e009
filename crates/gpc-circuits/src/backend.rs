//! # Proving System Interface (Sealed)
//!
//! The interface this layer consumes from an underlying proof system:
//! `full_prove` turns compiled circuit inputs plus artifacts into a proof
//! and its public signal vector, and `verify` checks a proof against a
//! claimed signal vector.
//!
//! ## Sealed Trait
//!
//! `ProvingSystem` is sealed: only implementations defined within this
//! crate can exist, so no unvetted backend can be injected into the proof
//! driver. The in-tree implementation is the deterministic
//! [`MockProofSystem`](crate::mock::MockProofSystem); a real Groth16
//! backend satisfies the same contract.
//!
//! ## Error Split
//!
//! Failures to *produce* a proof (malformed inputs, unsatisfiable
//! witness) are errors. An *invalid* proof is not an error: `verify`
//! returns `Ok(false)` so callers can branch without exception handling.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::signals::{CircuitInputs, CircuitSignal};

/// Error during proof generation.
#[derive(Error, Debug)]
pub enum ProofError {
    /// The circuit inputs are malformed (wrong widths, indices out of
    /// range).
    #[error("invalid circuit inputs: {0}")]
    InvalidInputs(String),

    /// The inputs are well-formed but no satisfying witness exists.
    #[error("witness unsatisfiable: {0}")]
    Unsatisfiable(String),

    /// Proof generation failed internally.
    #[error("proof generation failed: {0}")]
    GenerationFailed(String),
}

/// Error during proof verification.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The proof is structurally malformed (wrong length, corrupt
    /// encoding). Distinct from a well-formed proof that fails to verify,
    /// which is `Ok(false)`.
    #[error("malformed proof: {0}")]
    MalformedProof(String),

    /// Verification could not be carried out.
    #[error("proof verification failed: {0}")]
    VerificationFailed(String),
}

/// An opaque proof artifact. Serializes as a hex string.
#[derive(Clone, PartialEq, Eq)]
pub struct ProofData {
    bytes: Vec<u8>,
}

impl ProofData {
    /// Wrap raw proof bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// The raw proof bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Render as lowercase hex.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse from a hex string.
    pub fn from_hex(hex: &str) -> Result<Self, VerifyError> {
        let hex = hex.trim().to_lowercase();
        if hex.len() % 2 != 0 {
            return Err(VerifyError::MalformedProof(
                "hex string must have even length".to_string(),
            ));
        }
        let bytes = (0..hex.len())
            .step_by(2)
            .map(|i| {
                u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| {
                    VerifyError::MalformedProof(format!("invalid hex at position {i}: {e}"))
                })
            })
            .collect::<Result<Vec<u8>, VerifyError>>()?;
        Ok(Self { bytes })
    }
}

impl Serialize for ProofData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ProofData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for ProofData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.bytes.iter().take(4).map(|b| format!("{b:02x}")).collect();
        write!(f, "ProofData({prefix}..., {} bytes)", self.bytes.len())
    }
}

/// A proof together with the public signal vector it commits to.
#[derive(Debug, Clone)]
pub struct ProveResult {
    /// The proof artifact.
    pub proof: ProofData,
    /// The full public signal vector, outputs first.
    pub public_signals: Vec<CircuitSignal>,
}

/// Private module that seals the [`ProvingSystem`] trait.
mod private {
    /// Sealing marker trait. Not accessible outside this crate.
    pub trait Sealed {}
}

/// Sealed interface for an underlying zero-knowledge proof system.
///
/// `Send + Sync` so a shared backend can serve concurrent prove/verify
/// calls; implementations hold no mutable state.
pub trait ProvingSystem: private::Sealed + Send + Sync {
    /// Generate a proof from compiled inputs and artifacts, returning the
    /// proof and the full public signal vector.
    ///
    /// # Errors
    ///
    /// [`ProofError::InvalidInputs`] for malformed signal arrays,
    /// [`ProofError::Unsatisfiable`] when no witness satisfies the
    /// constraints, [`ProofError::GenerationFailed`] for internal
    /// failures.
    fn full_prove(
        &self,
        inputs: &CircuitInputs,
        wasm: &Path,
        proving_key: &Path,
    ) -> Result<ProveResult, ProofError>;

    /// Verify a proof against a claimed public signal vector.
    ///
    /// Returns `Ok(false)` for a well-formed but invalid proof; errors
    /// only when verification cannot be carried out at all.
    fn verify(
        &self,
        verification_key: &Path,
        public_signals: &[CircuitSignal],
        proof: &ProofData,
    ) -> Result<bool, VerifyError>;
}

impl private::Sealed for crate::mock::MockProofSystem {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proof_data_hex_roundtrip() {
        let proof = ProofData::from_bytes(vec![0, 1, 254, 255]);
        let hex = proof.to_hex();
        assert_eq!(hex, "0001feff");
        assert_eq!(ProofData::from_hex(&hex).unwrap(), proof);
    }

    #[test]
    fn test_proof_data_serde() {
        let proof = ProofData::from_bytes(vec![0xab; 32]);
        let json = serde_json::to_string(&proof).unwrap();
        assert_eq!(json.len(), 64 + 2);
        let back: ProofData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, proof);
    }

    #[test]
    fn test_proof_data_rejects_bad_hex() {
        assert!(ProofData::from_hex("abc").is_err());
        assert!(ProofData::from_hex("zz").is_err());
    }

    #[test]
    fn test_debug_shows_prefix_only() {
        let proof = ProofData::from_bytes(vec![0xde, 0xad, 0xbe, 0xef, 0x01]);
        let debug = format!("{proof:?}");
        assert!(debug.starts_with("ProofData(deadbeef..."));
    }
}
