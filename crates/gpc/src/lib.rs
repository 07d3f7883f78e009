//! # gpc — General Purpose Circuit Proofs over PODs
//!
//! A declarative layer for proving properties of signed, Merkle-committed
//! key/value objects (PODs) without revealing unrevealed entries.
//! Callers describe *what* to prove in a [`GpcProofConfig`]; this crate
//! canonicalizes the configuration, derives the minimum circuit size it
//! needs, picks the smallest pre-compiled family member that fits, binds
//! concrete inputs to that circuit's signal layout, drives the proving
//! backend, and reconstructs the [`GpcRevealedClaims`] a verifier can
//! trust.
//!
//! ## Prove, then verify
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use std::path::Path;
//!
//! use gpc::{gpc_prove, gpc_verify, GpcProofConfig, GpcProofInputs};
//! use gpc_core::PodName;
//! use gpc_crypto::SigningKeypair;
//! use gpc_pod::{Pod, PodValue};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let keypair = SigningKeypair::generate();
//! let mut entries = BTreeMap::new();
//! entries.insert(PodName::new("ticketID")?, PodValue::Int(999));
//! let pod = Pod::sign(entries, &keypair)?;
//!
//! let config: GpcProofConfig = serde_json::from_str(
//!     r#"{"pods":{"ticket":{"entries":{"ticketID":{"isRevealed":true}}}}}"#,
//! )?;
//! let mut pods = BTreeMap::new();
//! pods.insert(PodName::new("ticket")?, pod);
//! let inputs = GpcProofInputs {
//!     pods,
//!     owner: None,
//!     membership_lists: BTreeMap::new(),
//!     watermark: None,
//! };
//!
//! let result = gpc_prove(&config, &inputs, Path::new("artifacts"))?;
//! let verified = gpc_verify(
//!     &result.proof,
//!     &result.bound_config,
//!     &result.revealed_claims,
//!     Path::new("artifacts"),
//! )?;
//! assert!(verified);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error model
//!
//! Structural problems (malformed configs, dangling references,
//! ill-typed values) throw typed [`GpcError`]s before any circuit work.
//! Proof *validity* never throws: `gpc_verify` returns `Ok(false)` for
//! invalid, tampered, mismatched, or non-canonical material.

pub mod canon;
pub mod checks;
mod claims;
mod compile;
pub mod error;
pub mod prover;
pub mod requirements;
pub mod types;

pub use canon::{
    bounds_check_config_from_proof_config, canonicalize_bound_config, canonicalize_entry_config,
    canonicalize_proof_config, canonicalize_virtual_entry_config, make_circuit_identifier,
    make_watermark_signal,
};
pub use error::{GpcConfigError, GpcError, GpcResolutionError, GpcValueError};
pub use prover::{gpc_prove, gpc_verify, GpcProveResult, GpcProver};
pub use requirements::derive_requirements;
pub use types::{
    GpcBoundConfig, GpcIdentifier, GpcProofConfig, GpcProofEntryConfig, GpcProofInputs,
    GpcProofObjectConfig, GpcProofOwnerInputs, GpcProofTupleConfig, GpcRevealedClaims,
    GpcRevealedObjectClaims, GpcRevealedOwnerClaims, GpcVirtualEntryConfig, IntRange,
    MembershipList, PodEntryIdentifier,
};

// Re-exported so downstream callers can name the backend pieces the
// driver consumes without depending on gpc-circuits directly.
pub use gpc_circuits::backend::ProofData;
pub use gpc_circuits::family::CircuitFamily;
pub use gpc_circuits::mock::MockProofSystem;
