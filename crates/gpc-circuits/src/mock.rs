//! # Mock Proof System — Deterministic Backend
//!
//! A deterministic, transparent proving backend. Witness generation
//! evaluates the family's constraint semantics directly over the compiled
//! signal arrays (object signatures, Merkle proofs, equality wiring,
//! numeric bounds, list membership, the owner commitment), erroring when
//! no satisfying witness exists; the proof artifact is a SHA-256
//! commitment over the public signal vector, keyed by the artifact the
//! proof was generated against.
//!
//! ## Security Notice
//!
//! This backend provides NO zero-knowledge privacy. It satisfies the
//! sealed [`ProvingSystem`](crate::backend::ProvingSystem) contract with
//! the same satisfiability and tamper behavior a real backend exhibits,
//! which is what the proof layer and its tests exercise. Production
//! deployments substitute a real Groth16 backend behind the same trait.

use std::path::Path;

use gpc_core::{field_neg_one, CanonicalBytes};
use gpc_crypto::ed25519::{self, PodSignature, SignerPublicKey};
use gpc_crypto::field_hash::{numeric_value_hash, public_key_hash, tuple_hash};
use gpc_crypto::identity::{nullifier_hash, OwnerIdentity};
use gpc_crypto::merkle::{verify_entry_proof, MerkleEntryProof};
use gpc_pod::signing_payload;
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive};
use sha2::{Digest, Sha256};

use crate::backend::{ProofData, ProofError, ProveResult, ProvingSystem, VerifyError};
use crate::signals::{
    filter_public_inputs, make_public_signals, CircuitInputs, CircuitOutputs, CircuitSignal,
};

/// Domain tag for mock proof commitments.
const MOCK_PROOF_DOMAIN: &str = "gpc.mock.proof.v1";

/// Deterministic mock proving backend.
#[derive(Debug, Clone, Default)]
pub struct MockProofSystem;

impl ProvingSystem for MockProofSystem {
    fn full_prove(
        &self,
        inputs: &CircuitInputs,
        _wasm: &Path,
        proving_key: &Path,
    ) -> Result<ProveResult, ProofError> {
        let widths = Widths::derive(inputs)?;
        check_objects(inputs)?;
        let combined = check_entries_and_build_table(inputs, &widths)?;
        let combined = extend_with_tuples(inputs, combined)?;
        check_equality(inputs, &combined, &widths)?;
        check_owner(inputs, &combined, &widths)?;
        check_numeric_bounds(inputs, &combined, &widths)?;
        check_list_membership(inputs, &combined)?;

        let outputs = compute_outputs(inputs, &combined, &widths);
        let public_signals = make_public_signals(&filter_public_inputs(inputs), &outputs);

        let key_tag = artifact_key_tag(proving_key, "-pkey");
        let digest = proof_digest(&key_tag, &public_signals)
            .map_err(|e| ProofError::GenerationFailed(e.to_string()))?;
        Ok(ProveResult {
            proof: ProofData::from_bytes(digest),
            public_signals,
        })
    }

    fn verify(
        &self,
        verification_key: &Path,
        public_signals: &[CircuitSignal],
        proof: &ProofData,
    ) -> Result<bool, VerifyError> {
        if proof.as_bytes().is_empty() {
            return Err(VerifyError::MalformedProof("empty proof".to_string()));
        }
        let key_tag = artifact_key_tag(verification_key, "-vkey");
        let expected = proof_digest(&key_tag, public_signals)
            .map_err(|e| VerifyError::VerificationFailed(e.to_string()))?;
        Ok(expected.as_slice() == proof.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// Derived widths and shape checking
// ---------------------------------------------------------------------------

struct Widths {
    max_objects: usize,
    max_entries: usize,
    merkle_max_depth: usize,
}

impl Widths {
    fn derive(inputs: &CircuitInputs) -> Result<Self, ProofError> {
        let max_objects = inputs.object_content_id.len();
        let max_entries = inputs.entry_name_hash.len();
        if max_objects == 0 || max_entries == 0 {
            return Err(ProofError::InvalidInputs(
                "at least one object and entry slot required".to_string(),
            ));
        }
        for (name, len) in [
            ("objectSignerPubkeyAx", inputs.object_signer_pubkey_ax.len()),
            ("objectSignerPubkeyAy", inputs.object_signer_pubkey_ay.len()),
            ("objectSignatureR8x", inputs.object_signature_r8x.len()),
            ("objectSignatureR8y", inputs.object_signature_r8y.len()),
            ("objectSignatureS", inputs.object_signature_s.len()),
        ] {
            if len != max_objects {
                return Err(ProofError::InvalidInputs(format!(
                    "{name} width {len} does not match {max_objects} object slots"
                )));
            }
        }
        for (name, len) in [
            ("entryObjectIndex", inputs.entry_object_index.len()),
            ("entryProofDepth", inputs.entry_proof_depth.len()),
            ("entryProofIndex", inputs.entry_proof_index.len()),
            ("entryProofSiblings", inputs.entry_proof_siblings.len()),
        ] {
            if len != max_entries {
                return Err(ProofError::InvalidInputs(format!(
                    "{name} width {len} does not match {max_entries} entry slots"
                )));
            }
        }
        let merkle_max_depth = inputs.entry_proof_siblings[0].len();
        if inputs
            .entry_proof_siblings
            .iter()
            .any(|row| row.len() != merkle_max_depth)
        {
            return Err(ProofError::InvalidInputs(
                "entryProofSiblings rows must share one width".to_string(),
            ));
        }
        if inputs.entry_equal_to_other_entry_by_index.len() != max_entries + max_objects {
            return Err(ProofError::InvalidInputs(
                "entryEqualToOtherEntryByIndex must cover entry and virtual slots".to_string(),
            ));
        }
        let numeric = inputs.numeric_value_entry_indices.len();
        if inputs.numeric_values.len() != numeric
            || inputs.numeric_min_values.len() != numeric
            || inputs.numeric_max_values.len() != numeric
        {
            return Err(ProofError::InvalidInputs(
                "numeric value arrays must share one width".to_string(),
            ));
        }
        if inputs.list_valid_values.len() != inputs.list_comparison_value_index.len() {
            return Err(ProofError::InvalidInputs(
                "list arrays must share one width".to_string(),
            ));
        }
        if let Some(first) = inputs.tuple_indices.first() {
            if first.len() < 2 || inputs.tuple_indices.iter().any(|r| r.len() != first.len()) {
                return Err(ProofError::InvalidInputs(
                    "tuple index rows must share one arity of at least 2".to_string(),
                ));
            }
        }
        Ok(Self {
            max_objects,
            max_entries,
            merkle_max_depth,
        })
    }
}

// ---------------------------------------------------------------------------
// Witness checks
// ---------------------------------------------------------------------------

fn check_objects(inputs: &CircuitInputs) -> Result<(), ProofError> {
    for slot in 0..inputs.object_content_id.len() {
        let public_key = SignerPublicKey::from_limbs(
            &inputs.object_signer_pubkey_ax[slot],
            &inputs.object_signer_pubkey_ay[slot],
        )
        .map_err(|e| ProofError::InvalidInputs(format!("object {slot}: {e}")))?;
        let signature = PodSignature::from_limbs(
            &inputs.object_signature_r8x[slot],
            &inputs.object_signature_r8y[slot],
            &inputs.object_signature_s[slot],
        )
        .map_err(|e| ProofError::InvalidInputs(format!("object {slot}: {e}")))?;
        let payload = signing_payload(&inputs.object_content_id[slot])
            .map_err(|e| ProofError::GenerationFailed(e.to_string()))?;
        ed25519::verify(&payload, &signature, &public_key).map_err(|_| {
            ProofError::Unsatisfiable(format!(
                "object {slot}: signature does not verify against content ID"
            ))
        })?;
    }
    Ok(())
}

/// Verify every entry slot's Merkle proof and build the combined value
/// hash table: entry slots first, then one virtual (signer key) slot per
/// object. Tuple slots are appended later.
fn check_entries_and_build_table(
    inputs: &CircuitInputs,
    widths: &Widths,
) -> Result<Vec<BigUint>, ProofError> {
    let mut table = Vec::with_capacity(widths.max_entries + widths.max_objects);
    for slot in 0..widths.max_entries {
        let object = signal_to_index(&inputs.entry_object_index[slot], widths.max_objects)
            .ok_or_else(|| {
                ProofError::InvalidInputs(format!("entry {slot}: object index out of range"))
            })?;
        let depth = signal_to_index(
            &inputs.entry_proof_depth[slot],
            widths.merkle_max_depth + 1,
        )
        .ok_or_else(|| {
            ProofError::InvalidInputs(format!("entry {slot}: proof depth out of range"))
        })?;
        if depth == 0 {
            return Err(ProofError::InvalidInputs(format!(
                "entry {slot}: proof depth must be positive"
            )));
        }
        let index = inputs.entry_proof_index[slot].to_u64().ok_or_else(|| {
            ProofError::InvalidInputs(format!("entry {slot}: proof index out of range"))
        })?;
        let proof = MerkleEntryProof {
            depth,
            index,
            siblings: inputs.entry_proof_siblings[slot][..depth].to_vec(),
        };
        if !verify_entry_proof(
            &inputs.object_content_id[object],
            &inputs.entry_name_hash[slot],
            &proof,
        ) {
            return Err(ProofError::Unsatisfiable(format!(
                "entry {slot}: merkle proof does not bind name to object content ID"
            )));
        }
        // The value hash rides as the first sibling of the name leaf.
        table.push(inputs.entry_proof_siblings[slot][0].clone());
    }
    for slot in 0..widths.max_objects {
        let public_key = SignerPublicKey::from_limbs(
            &inputs.object_signer_pubkey_ax[slot],
            &inputs.object_signer_pubkey_ay[slot],
        )
        .map_err(|e| ProofError::InvalidInputs(format!("object {slot}: {e}")))?;
        table.push(public_key_hash(public_key.as_bytes()));
    }
    Ok(table)
}

/// Evaluate tuple slots in order, appending each slot's hash to the
/// combined table so later slots (and list comparisons) can reference it.
fn extend_with_tuples(
    inputs: &CircuitInputs,
    mut table: Vec<BigUint>,
) -> Result<Vec<BigUint>, ProofError> {
    for (slot, row) in inputs.tuple_indices.iter().enumerate() {
        let operands = row
            .iter()
            .map(|signal| {
                signal_to_index(signal, table.len())
                    .map(|i| table[i].clone())
                    .ok_or_else(|| {
                        ProofError::InvalidInputs(format!(
                            "tuple slot {slot}: member index out of range"
                        ))
                    })
            })
            .collect::<Result<Vec<BigUint>, ProofError>>()?;
        table.push(tuple_hash(&operands));
    }
    Ok(table)
}

fn check_equality(
    inputs: &CircuitInputs,
    table: &[BigUint],
    widths: &Widths,
) -> Result<(), ProofError> {
    let slots = widths.max_entries + widths.max_objects;
    for (slot, eq_signal) in inputs.entry_equal_to_other_entry_by_index.iter().enumerate() {
        let other = signal_to_index(eq_signal, slots).ok_or_else(|| {
            ProofError::InvalidInputs(format!("entry {slot}: equality index out of range"))
        })?;
        if other != slot && table[slot] != table[other] {
            return Err(ProofError::Unsatisfiable(format!(
                "entry slot {slot} is constrained equal to slot {other} but values differ"
            )));
        }
    }
    Ok(())
}

fn check_owner(
    inputs: &CircuitInputs,
    table: &[BigUint],
    widths: &Widths,
) -> Result<(), ProofError> {
    if &inputs.owner_entry_index == field_neg_one() {
        return Ok(());
    }
    let slot = signal_to_index(&inputs.owner_entry_index, widths.max_entries).ok_or_else(
        || ProofError::InvalidInputs("owner entry index out of range".to_string()),
    )?;
    let identity = OwnerIdentity::from_secrets(
        inputs.owner_identity_nullifier.clone(),
        inputs.owner_identity_trapdoor.clone(),
    );
    let expected = numeric_value_hash(&identity.commitment());
    if table[slot] != expected {
        return Err(ProofError::Unsatisfiable(format!(
            "owner entry slot {slot} does not hold the identity commitment"
        )));
    }
    Ok(())
}

fn check_numeric_bounds(
    inputs: &CircuitInputs,
    table: &[BigUint],
    widths: &Widths,
) -> Result<(), ProofError> {
    for slot in 0..inputs.numeric_value_entry_indices.len() {
        let index_signal = &inputs.numeric_value_entry_indices[slot];
        if index_signal == field_neg_one() {
            continue;
        }
        let entry = signal_to_index(index_signal, widths.max_entries).ok_or_else(|| {
            ProofError::InvalidInputs(format!("numeric slot {slot}: entry index out of range"))
        })?;
        let value = inputs.numeric_values[slot];
        if numeric_value_hash(&gpc_core::field::i64_to_field(value)) != table[entry] {
            return Err(ProofError::Unsatisfiable(format!(
                "numeric slot {slot}: value does not match entry {entry}"
            )));
        }
        let (min, max) = (inputs.numeric_min_values[slot], inputs.numeric_max_values[slot]);
        if value < min || value > max {
            return Err(ProofError::Unsatisfiable(format!(
                "numeric slot {slot}: value {value} outside [{min}, {max}]"
            )));
        }
    }
    Ok(())
}

fn check_list_membership(inputs: &CircuitInputs, table: &[BigUint]) -> Result<(), ProofError> {
    for slot in 0..inputs.list_comparison_value_index.len() {
        let index_signal = &inputs.list_comparison_value_index[slot];
        if index_signal == field_neg_one() {
            continue;
        }
        let index = signal_to_index(index_signal, table.len()).ok_or_else(|| {
            ProofError::InvalidInputs(format!(
                "list slot {slot}: comparison index out of range"
            ))
        })?;
        let member = &table[index];
        let should_contain = inputs.list_contains_comparison_value.bit(slot as u64);
        let contains = inputs.list_valid_values[slot].contains(member);
        if contains != should_contain {
            return Err(ProofError::Unsatisfiable(format!(
                "list slot {slot}: comparison value {} the list",
                if should_contain {
                    "is missing from"
                } else {
                    "is present in"
                }
            )));
        }
    }
    Ok(())
}

fn compute_outputs(inputs: &CircuitInputs, table: &[BigUint], widths: &Widths) -> CircuitOutputs {
    let entry_revealed_value_hash = (0..widths.max_entries)
        .map(|slot| {
            if inputs.entry_is_value_hash_revealed.bit(slot as u64) {
                table[slot].clone()
            } else {
                field_neg_one().clone()
            }
        })
        .collect();
    let virtual_entry_revealed_value_hash = (0..widths.max_objects)
        .map(|slot| {
            if inputs.virtual_entry_is_value_hash_revealed.bit(slot as u64) {
                table[widths.max_entries + slot].clone()
            } else {
                field_neg_one().clone()
            }
        })
        .collect();
    let owner_revealed_nullifier_hash = if inputs.owner_is_nullifier_hash_revealed.is_one() {
        nullifier_hash(
            &inputs.owner_external_nullifier,
            &inputs.owner_identity_nullifier,
        )
    } else {
        field_neg_one().clone()
    };
    CircuitOutputs {
        entry_revealed_value_hash,
        virtual_entry_revealed_value_hash,
        owner_revealed_nullifier_hash,
    }
}

// ---------------------------------------------------------------------------
// Proof commitment
// ---------------------------------------------------------------------------

/// The key tag both halves of a key pair share: the artifact file stem
/// with its role suffix stripped, i.e. the circuit identifier.
fn artifact_key_tag(path: &Path, suffix: &str) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    stem.strip_suffix(suffix).unwrap_or(stem).to_string()
}

fn proof_digest(
    key_tag: &str,
    public_signals: &[CircuitSignal],
) -> Result<Vec<u8>, gpc_core::CanonicalizationError> {
    let decimal: Vec<String> = public_signals
        .iter()
        .map(|s| s.to_str_radix(10))
        .collect();
    let canonical = CanonicalBytes::new(&decimal)?;
    let mut hasher = Sha256::new();
    hasher.update(MOCK_PROOF_DOMAIN.as_bytes());
    hasher.update((key_tag.len() as u32).to_be_bytes());
    hasher.update(key_tag.as_bytes());
    hasher.update(canonical.as_bytes());
    Ok(hasher.finalize().to_vec())
}

fn signal_to_index(signal: &CircuitSignal, bound: usize) -> Option<usize> {
    signal.to_usize().filter(|i| *i < bound)
}
