//! # Error Taxonomy — Throw vs. Return False
//!
//! The proof layer distinguishes structural problems from proof validity:
//!
//! - **Configuration errors**: a malformed proof configuration, caught
//!   before any circuit work.
//! - **Value errors**: a POD value, watermark, or membership list that is
//!   not well-formed.
//! - **Resolution errors**: references that dangle between configuration,
//!   inputs, and claims, or a circuit that cannot be found or fit.
//! - Backend errors propagate unreinterpreted.
//!
//! All of these throw. Proof *validity* never throws: `gpc_verify`
//! returns `Ok(false)` for invalid, tampered, mismatched, or
//! non-canonical material so callers can branch without exception
//! handling on the hot path.

use gpc_circuits::backend::{ProofError, VerifyError};
use gpc_circuits::signals::SignalLayoutError;
use gpc_core::CanonicalizationError;
use gpc_pod::PodError;
use thiserror::Error;

/// Top-level error for proving and verification.
#[derive(Error, Debug)]
pub enum GpcError {
    /// Malformed proof configuration.
    #[error("configuration error: {0}")]
    Config(#[from] GpcConfigError),

    /// Malformed input or claimed value.
    #[error("value error: {0}")]
    Value(#[from] GpcValueError),

    /// Dangling reference or unsatisfiable circuit lookup.
    #[error("resolution error: {0}")]
    Resolution(#[from] GpcResolutionError),

    /// A POD failed validation.
    #[error("pod error: {0}")]
    Pod(#[from] PodError),

    /// Proof generation failed in the backend.
    #[error("proof error: {0}")]
    Proof(#[from] ProofError),

    /// Verification could not be carried out by the backend.
    #[error("verify error: {0}")]
    Verify(#[from] VerifyError),

    /// A public signal vector did not match the circuit's layout.
    #[error("signal layout error: {0}")]
    SignalLayout(#[from] SignalLayoutError),

    /// Canonical serialization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// Malformed proof configuration, independent of any inputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GpcConfigError {
    /// A proof configuration must name at least one POD.
    #[error("proof configuration contains no objects")]
    NoObjects,

    /// Must prove at least one entry in each object.
    #[error("must prove at least one entry in object {0}")]
    NoEntries(String),

    /// At most one entry per POD may be the owner ID.
    #[error("object {0} declares more than one owner entry")]
    MultipleOwnerEntries(String),

    /// A secondary owner entry is already wired equal to the first owner
    /// entry; an explicit equality constraint cannot share the slot.
    #[error("owner entry {0} cannot also declare equalsEntry")]
    OwnerEqualityConflict(String),

    /// Tuples group two or more entries.
    #[error("tuple {0} must have arity at least 2")]
    TupleTooNarrow(String),

    /// A numeric range with min above max.
    #[error("invalid range for entry {entry}: min {min} exceeds max {max}")]
    InvalidRange {
        /// The constrained entry, as `pod.entry`.
        entry: String,
        /// Configured lower bound.
        min: i64,
        /// Configured upper bound.
        max: i64,
    },
}

/// A value that is not well-formed for its role.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GpcValueError {
    /// A POD value failed validation.
    #[error("invalid value for entry {name}: {reason}")]
    InvalidValue {
        /// Which entry (or input slot, e.g. `watermark`) held the value.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A range constraint on an entry that does not hold an int.
    #[error("entry {0} must hold an int value for a range constraint")]
    RangeOnNonInt(String),

    /// Membership lists must not be empty.
    #[error("membership list {0} must not be empty")]
    EmptyList(String),

    /// A membership list mixing single values and tuples, or tuples of
    /// unequal arity.
    #[error("membership list {0} mixes element shapes")]
    MixedList(String),

    /// A membership list whose element shape does not match the
    /// constraint comparing against it.
    #[error("membership list {list} has the wrong element shape: expected {expected}")]
    ListShapeMismatch {
        /// The offending list.
        list: String,
        /// Shape the configuration requires, e.g. `values` or `3-tuples`.
        expected: String,
    },
}

/// A reference that does not resolve, or a circuit that cannot be found
/// or cannot fit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GpcResolutionError {
    /// Configured POD object missing from inputs.
    #[error("configured POD object {0} not provided in inputs")]
    MissingPod(String),

    /// Input POD object not declared in the configuration.
    #[error("input POD object {0} not declared in configuration")]
    UnconfiguredPod(String),

    /// A configured entry absent from the POD's actual entries.
    #[error("entry {entry} not present in POD {pod}")]
    MissingEntry {
        /// The POD alias.
        pod: String,
        /// The missing entry name.
        entry: String,
    },

    /// An `equalsEntry` or tuple reference that resolves to nothing.
    #[error("reference {0} does not resolve to a configured entry")]
    DanglingEntryRef(String),

    /// A referenced membership list that was not provided.
    #[error("membership list {0} referenced by configuration but not provided")]
    MissingList(String),

    /// A provided membership list that nothing references.
    #[error("membership list {0} provided but not referenced by configuration")]
    UnreferencedList(String),

    /// The configuration binds an owner entry but no identity was given.
    #[error("owner identity required by configuration but not provided")]
    MissingOwner,

    /// An identity was given but no entry is configured as owner ID.
    #[error("owner inputs provided but no entry is configured as owner ID")]
    UnusedOwner,

    /// No family member is large enough for the derived requirements.
    #[error("no circuit in family {0} meets the required parameters")]
    NoCircuit(String),

    /// A pinned circuit identifier that names no known circuit.
    #[error("unknown circuit identifier {0}")]
    UnknownCircuit(String),

    /// A pinned circuit too small for the compiled configuration.
    #[error("circuit {circuit} cannot fit this configuration: {reason}")]
    CircuitTooSmall {
        /// The pinned circuit identifier.
        circuit: String,
        /// Which dimension overflowed.
        reason: String,
    },

    /// Configuration reveals an entry the claims do not carry.
    #[error("configuration reveals entry {0} but the POD is not revealed in claims")]
    MissingRevealedEntry(String),

    /// Claims reveal an entry the configuration does not mark revealed.
    #[error("claims reveal entry {0} not marked revealed in configuration")]
    UnexpectedRevealedEntry(String),

    /// Configuration reveals a signer key the claims do not carry.
    #[error("configuration reveals the signer key of {0} but claims omit it")]
    MissingSignerKey(String),

    /// Claims carry a signer key the configuration hides.
    #[error("claims carry a signer key for {0} that the configuration hides")]
    UnexpectedSignerKey(String),

    /// Claims carry a POD block nothing in the configuration reveals.
    #[error("claims carry POD {0} but the configuration reveals nothing from it")]
    UnexpectedPodClaims(String),
}
