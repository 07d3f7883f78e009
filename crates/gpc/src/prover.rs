//! # Proof Driver — Orchestrating Prove and Verify
//!
//! [`GpcProver`] wires the pieces together: derive requirements, pick a
//! circuit (or honor a pinned one), compile inputs, invoke the backend,
//! and assemble bound config + claims. Verification runs the last steps
//! in reverse: re-canonicalize and reject, find the pinned circuit,
//! reconstruct public signals from bound config + claims, and hand the
//! proof to the backend.
//!
//! The prover holds the circuit family and backend explicitly; there is
//! no global registry. Tests substitute synthetic families and the
//! production caller shares one prover across threads (all state is
//! read-only after construction).

use std::path::Path;

use gpc_circuits::artifacts::artifact_paths;
use gpc_circuits::backend::{ProofData, ProvingSystem};
use gpc_circuits::family::{CircuitDesc, CircuitFamily};
use gpc_circuits::mock::MockProofSystem;
use gpc_circuits::signals::{make_public_signals, outputs_from_public_signals};
use tracing::debug;

use crate::canon::{
    bind_config, canonicalize_bound_config, canonicalize_proof_config, make_circuit_identifier,
};
use crate::checks::{check_bound_config, check_proof_config, check_proof_inputs,
    check_revealed_claims};
use crate::claims::extract_revealed_claims;
use crate::compile::{compile_prove_inputs, compile_verify_data};
use crate::error::{GpcError, GpcResolutionError};
use crate::requirements::derive_requirements;
use crate::types::{GpcBoundConfig, GpcProofConfig, GpcProofInputs, GpcRevealedClaims};

/// The result of a successful proof: the proof artifact, the
/// configuration bound to the circuit that proved it, and the claims a
/// verifier can trust.
#[derive(Debug, Clone)]
pub struct GpcProveResult {
    /// The proof artifact.
    pub proof: ProofData,
    /// The canonical configuration bound to the proving circuit.
    pub bound_config: GpcBoundConfig,
    /// The revealed claims.
    pub revealed_claims: GpcRevealedClaims,
}

/// A proof driver holding a circuit family and a proving backend.
#[derive(Debug, Clone)]
pub struct GpcProver<B: ProvingSystem> {
    family: CircuitFamily,
    backend: B,
}

impl GpcProver<MockProofSystem> {
    /// The driver over the shipped proto-pod-gpc family and the
    /// deterministic mock backend.
    pub fn proto_pod_gpc() -> Self {
        Self::new(CircuitFamily::proto_pod_gpc(), MockProofSystem)
    }
}

impl<B: ProvingSystem> GpcProver<B> {
    /// Build a driver from an explicit family and backend.
    pub fn new(family: CircuitFamily, backend: B) -> Self {
        Self { family, backend }
    }

    /// The family this driver selects circuits from.
    pub fn family(&self) -> &CircuitFamily {
        &self.family
    }

    /// Generate a proof.
    ///
    /// Checks configuration and inputs, canonicalizes the configuration,
    /// derives minimum circuit parameters, selects the cheapest fitting
    /// circuit (or honors a pinned identifier), compiles the signal
    /// arrays, and invokes the backend. Artifacts are resolved under
    /// `artifacts_base` by circuit identifier.
    ///
    /// # Errors
    ///
    /// Typed configuration/value/resolution errors for structural
    /// problems; backend errors (including unsatisfiable witnesses)
    /// propagate unreinterpreted. Never retried: identical inputs
    /// produce identical outcomes.
    pub fn prove(
        &self,
        config: &GpcProofConfig,
        inputs: &GpcProofInputs,
        artifacts_base: &Path,
    ) -> Result<GpcProveResult, GpcError> {
        check_proof_config(config)?;
        check_proof_inputs(config, inputs)?;
        let canonical = canonicalize_proof_config(config);

        let required = derive_requirements(&canonical, inputs)?;
        let circuit = self.select_circuit(&canonical, &required)?;
        let identifier = make_circuit_identifier(circuit);
        debug!(circuit = %identifier, cost = circuit.cost, "selected circuit");

        let circuit_inputs = compile_prove_inputs(&canonical, inputs, circuit)?;
        let paths = artifact_paths(artifacts_base, identifier.as_str());
        let result = self
            .backend
            .full_prove(&circuit_inputs, &paths.wasm, &paths.proving_key)?;
        let outputs = outputs_from_public_signals(
            &result.public_signals,
            circuit.params.max_entries,
            circuit.params.max_virtual_entries(),
        )?;

        let revealed_claims = extract_revealed_claims(&canonical, inputs, &outputs)?;
        let bound_config = bind_config(&canonical, identifier);
        Ok(GpcProveResult {
            proof: result.proof,
            bound_config,
            revealed_claims,
        })
    }

    /// Verify a proof against a bound configuration and claims.
    ///
    /// Structural problems in the bound config or claims throw typed
    /// errors. Everything that bears on the proof's *validity* (a
    /// non-canonical bound config, an unknown circuit, any mismatched
    /// signal, a tampered proof) returns `Ok(false)` and never throws.
    pub fn verify(
        &self,
        proof: &ProofData,
        bound_config: &GpcBoundConfig,
        claims: &GpcRevealedClaims,
        artifacts_base: &Path,
    ) -> Result<bool, GpcError> {
        check_bound_config(bound_config)?;
        check_revealed_claims(bound_config, claims)?;

        if &canonicalize_bound_config(bound_config) != bound_config {
            debug!("rejecting non-canonical bound config");
            return Ok(false);
        }
        let Some((family_name, circuit_name)) = bound_config.circuit_identifier.split()
        else {
            debug!(identifier = %bound_config.circuit_identifier, "malformed circuit identifier");
            return Ok(false);
        };
        let Some(circuit) = self.family.find_circuit(family_name, circuit_name) else {
            debug!(identifier = %bound_config.circuit_identifier, "unknown circuit");
            return Ok(false);
        };

        let (public_inputs, outputs) = compile_verify_data(bound_config, claims, circuit)?;
        let public_signals = make_public_signals(&public_inputs, &outputs);
        let paths = artifact_paths(artifacts_base, bound_config.circuit_identifier.as_str());
        let verified = self
            .backend
            .verify(&paths.verification_key, &public_signals, proof)?;
        Ok(verified)
    }

    /// Pick the circuit to prove with: the cheapest family member
    /// meeting the requirements, or the pinned identifier (whose fit is
    /// enforced during compilation, where tuple chaining against the
    /// pinned circuit's arity is known).
    fn select_circuit(
        &self,
        config: &GpcProofConfig,
        required: &gpc_circuits::params::GpcCircuitParams,
    ) -> Result<&CircuitDesc, GpcError> {
        match &config.circuit_identifier {
            Some(identifier) => {
                let (family_name, circuit_name) = identifier.split().ok_or_else(|| {
                    GpcResolutionError::UnknownCircuit(identifier.to_string())
                })?;
                self.family
                    .find_circuit(family_name, circuit_name)
                    .ok_or_else(|| {
                        GpcResolutionError::UnknownCircuit(identifier.to_string()).into()
                    })
            }
            None => self.family.pick_circuit(required).ok_or_else(|| {
                GpcResolutionError::NoCircuit(self.family.family_name().to_string()).into()
            }),
        }
    }
}

/// Prove with the shipped proto-pod-gpc family and the deterministic
/// mock backend.
pub fn gpc_prove(
    config: &GpcProofConfig,
    inputs: &GpcProofInputs,
    artifacts_base: &Path,
) -> Result<GpcProveResult, GpcError> {
    GpcProver::proto_pod_gpc().prove(config, inputs, artifacts_base)
}

/// Verify with the shipped proto-pod-gpc family and the deterministic
/// mock backend.
pub fn gpc_verify(
    proof: &ProofData,
    bound_config: &GpcBoundConfig,
    claims: &GpcRevealedClaims,
    artifacts_base: &Path,
) -> Result<bool, GpcError> {
    GpcProver::proto_pod_gpc().verify(proof, bound_config, claims, artifacts_base)
}
