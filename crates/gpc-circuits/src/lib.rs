//! # gpc-circuits — The proto-pod-gpc Circuit Family
//!
//! Everything the proof layer knows about the numeric circuit family:
//!
//! - [`params`]: the eight size parameters that define a family member and
//!   the name they derive.
//! - [`family`]: circuit descriptors with constraint costs, loaded from the
//!   generated metadata file into an explicitly constructed, immutable
//!   registry.
//! - [`signals`]: the full input/public/output signal layout and the
//!   public-signal vector ordering the prover and verifier must agree on.
//! - [`tuple`]: fixed-arity tuple hashing with chaining for wider tuples.
//! - [`artifacts`]: resolution of the three per-circuit artifacts from a
//!   base directory.
//! - [`backend`]: the sealed proving-system interface, and [`mock`], the
//!   deterministic backend that evaluates the family's constraint
//!   semantics directly.

pub mod artifacts;
pub mod backend;
pub mod family;
pub mod mock;
pub mod params;
pub mod signals;
pub mod tuple;

pub use artifacts::{artifact_paths, GpcArtifactPaths};
pub use backend::{ProofData, ProofError, ProveResult, ProvingSystem, VerifyError};
pub use family::{merge_required_params, CircuitDesc, CircuitFamily};
pub use mock::MockProofSystem;
pub use params::{GpcCircuitParams, PROTO_POD_GPC_FAMILY_NAME};
pub use signals::{CircuitInputs, CircuitOutputs, CircuitPublicInputs, CircuitSignal};
