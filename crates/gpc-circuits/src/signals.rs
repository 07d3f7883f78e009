//! # Circuit Signals — Input, Public Input, and Output Layout
//!
//! The flattened, fixed-width signal arrays a family member consumes and
//! produces. Array widths are the chosen circuit's size parameters; the
//! compiler pads real data out to those widths before anything reaches a
//! backend.
//!
//! The one ordering both sides of a proof must agree on is
//! [`make_public_signals`]: the prover's public signal vector and the
//! verifier's reconstruction from bound config + claims are the same
//! function of the same data. Signed numeric bounds are normalized into
//! the field by `zero_residue_mod` at exactly this point, which keeps the
//! reconstructed vector bit-for-bit equal to what the prover emitted.

use gpc_core::field::{i64_to_field, zero_residue_mod};
use gpc_core::field_modulus;
use num_bigint::{BigInt, BigUint};
use thiserror::Error;

/// One circuit signal: an element of the proof-system field.
pub type CircuitSignal = BigUint;

/// Error interpreting a public signal vector.
#[derive(Error, Debug)]
pub enum SignalLayoutError {
    /// The vector is shorter than the circuit's output section.
    #[error("public signal vector holds {got} signals, expected at least {need}")]
    TooShort {
        /// Signals present.
        got: usize,
        /// Signals the output section needs.
        need: usize,
    },
}

/// Full set of input signals to a proof. Comments note array widths;
/// `PUB` marks signals that are public.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitInputs {
    // Object modules [max_objects].
    pub object_content_id: Vec<CircuitSignal>,
    pub object_signer_pubkey_ax: Vec<CircuitSignal>,
    pub object_signer_pubkey_ay: Vec<CircuitSignal>,
    pub object_signature_r8x: Vec<CircuitSignal>,
    pub object_signature_r8y: Vec<CircuitSignal>,
    pub object_signature_s: Vec<CircuitSignal>,

    // Entry modules [max_entries].
    /*PUB*/ pub entry_object_index: Vec<CircuitSignal>,
    /*PUB*/ pub entry_name_hash: Vec<CircuitSignal>,
    /*PUB*/ pub entry_is_value_hash_revealed: CircuitSignal, // packed bits
    pub entry_proof_depth: Vec<CircuitSignal>,
    pub entry_proof_index: Vec<CircuitSignal>,
    pub entry_proof_siblings: Vec<Vec<CircuitSignal>>, // [max_entries][merkle_max_depth]

    // Virtual entry module [max_virtual_entries].
    /*PUB*/ pub virtual_entry_is_value_hash_revealed: CircuitSignal, // packed bits

    // Entry constraint modules [max_entries + max_virtual_entries].
    /*PUB*/ pub entry_equal_to_other_entry_by_index: Vec<CircuitSignal>,

    // Owner module (1).
    /*PUB*/ pub owner_entry_index: CircuitSignal,
    pub owner_identity_nullifier: CircuitSignal,
    pub owner_identity_trapdoor: CircuitSignal,
    /*PUB*/ pub owner_external_nullifier: CircuitSignal,
    /*PUB*/ pub owner_is_nullifier_hash_revealed: CircuitSignal,

    // Numeric value modules [max_numeric_values]. Bounds travel raw
    // (signed); they are reduced into the field only when the public
    // signal vector is formed.
    pub numeric_values: Vec<i64>,
    /*PUB*/ pub numeric_value_entry_indices: Vec<CircuitSignal>,
    /*PUB*/ pub numeric_min_values: Vec<i64>,
    /*PUB*/ pub numeric_max_values: Vec<i64>,

    // MultiTuple module [max_tuples][tuple_arity].
    /*PUB*/ pub tuple_indices: Vec<Vec<CircuitSignal>>,

    // List membership modules [max_lists].
    /*PUB*/ pub list_comparison_value_index: Vec<CircuitSignal>,
    /*PUB*/ pub list_contains_comparison_value: CircuitSignal, // packed bits
    /*PUB*/ pub list_valid_values: Vec<Vec<CircuitSignal>>, // [max_lists][max_list_elements]

    // Global module (1).
    /*PUB*/ pub global_watermark: CircuitSignal,
}

/// Only the public input signals to a proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitPublicInputs {
    pub entry_object_index: Vec<CircuitSignal>,
    pub entry_name_hash: Vec<CircuitSignal>,
    pub entry_is_value_hash_revealed: CircuitSignal,
    pub virtual_entry_is_value_hash_revealed: CircuitSignal,
    pub entry_equal_to_other_entry_by_index: Vec<CircuitSignal>,
    pub owner_entry_index: CircuitSignal,
    pub owner_external_nullifier: CircuitSignal,
    pub owner_is_nullifier_hash_revealed: CircuitSignal,
    pub numeric_value_entry_indices: Vec<CircuitSignal>,
    pub numeric_min_values: Vec<i64>,
    pub numeric_max_values: Vec<i64>,
    pub tuple_indices: Vec<Vec<CircuitSignal>>,
    pub list_comparison_value_index: Vec<CircuitSignal>,
    pub list_contains_comparison_value: CircuitSignal,
    pub list_valid_values: Vec<Vec<CircuitSignal>>,
    pub global_watermark: CircuitSignal,
}

/// All output signals from a proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitOutputs {
    /// Revealed value hash per entry slot; the hidden-value sentinel
    /// (modulus − 1) for unrevealed slots.
    pub entry_revealed_value_hash: Vec<CircuitSignal>,
    /// Revealed signer-key hash per virtual entry slot.
    pub virtual_entry_revealed_value_hash: Vec<CircuitSignal>,
    /// Revealed nullifier hash, or the sentinel when not revealed.
    pub owner_revealed_nullifier_hash: CircuitSignal,
}

/// Extract the public inputs from the full input set.
pub fn filter_public_inputs(inputs: &CircuitInputs) -> CircuitPublicInputs {
    CircuitPublicInputs {
        entry_object_index: inputs.entry_object_index.clone(),
        entry_name_hash: inputs.entry_name_hash.clone(),
        entry_is_value_hash_revealed: inputs.entry_is_value_hash_revealed.clone(),
        virtual_entry_is_value_hash_revealed: inputs
            .virtual_entry_is_value_hash_revealed
            .clone(),
        entry_equal_to_other_entry_by_index: inputs
            .entry_equal_to_other_entry_by_index
            .clone(),
        owner_entry_index: inputs.owner_entry_index.clone(),
        owner_external_nullifier: inputs.owner_external_nullifier.clone(),
        owner_is_nullifier_hash_revealed: inputs.owner_is_nullifier_hash_revealed.clone(),
        numeric_value_entry_indices: inputs.numeric_value_entry_indices.clone(),
        numeric_min_values: inputs.numeric_min_values.clone(),
        numeric_max_values: inputs.numeric_max_values.clone(),
        tuple_indices: inputs.tuple_indices.clone(),
        list_comparison_value_index: inputs.list_comparison_value_index.clone(),
        list_contains_comparison_value: inputs.list_contains_comparison_value.clone(),
        list_valid_values: inputs.list_valid_values.clone(),
        global_watermark: inputs.global_watermark.clone(),
    }
}

/// Extract named outputs from a public signal vector.
///
/// Because of the flattened representation, the circuit's `max_entries`
/// and `max_virtual_entries` must be known to slice the output section.
pub fn outputs_from_public_signals(
    public_signals: &[CircuitSignal],
    max_entries: usize,
    max_virtual_entries: usize,
) -> Result<CircuitOutputs, SignalLayoutError> {
    let need = max_entries + max_virtual_entries + 1;
    if public_signals.len() < need {
        return Err(SignalLayoutError::TooShort {
            got: public_signals.len(),
            need,
        });
    }
    Ok(CircuitOutputs {
        entry_revealed_value_hash: public_signals[..max_entries].to_vec(),
        virtual_entry_revealed_value_hash: public_signals
            [max_entries..max_entries + max_virtual_entries]
            .to_vec(),
        owner_revealed_nullifier_hash: public_signals[max_entries + max_virtual_entries]
            .clone(),
    })
}

/// Form the public signal vector from public inputs and outputs.
///
/// Signed numeric bounds are replaced with their zero-residues modulo the
/// field modulus here, to agree with the values a prover emits (provers
/// always normalize this way). This ordering is the verification
/// contract; both the prover and the verifier's reconstruction flow
/// through this one function.
pub fn make_public_signals(
    inputs: &CircuitPublicInputs,
    outputs: &CircuitOutputs,
) -> Vec<CircuitSignal> {
    let modulus = field_modulus();
    let mut signals = Vec::new();
    signals.extend(outputs.entry_revealed_value_hash.iter().cloned());
    signals.extend(outputs.virtual_entry_revealed_value_hash.iter().cloned());
    signals.push(outputs.owner_revealed_nullifier_hash.clone());
    signals.extend(inputs.entry_object_index.iter().cloned());
    signals.extend(inputs.entry_name_hash.iter().cloned());
    signals.push(inputs.entry_is_value_hash_revealed.clone());
    signals.push(inputs.virtual_entry_is_value_hash_revealed.clone());
    signals.extend(inputs.entry_equal_to_other_entry_by_index.iter().cloned());
    signals.push(inputs.owner_entry_index.clone());
    signals.push(inputs.owner_external_nullifier.clone());
    signals.push(inputs.owner_is_nullifier_hash_revealed.clone());
    signals.extend(inputs.numeric_value_entry_indices.iter().cloned());
    signals.extend(
        inputs
            .numeric_min_values
            .iter()
            .map(|v| zero_residue_mod(&BigInt::from(*v), modulus)),
    );
    signals.extend(
        inputs
            .numeric_max_values
            .iter()
            .map(|v| zero_residue_mod(&BigInt::from(*v), modulus)),
    );
    signals.extend(inputs.tuple_indices.iter().flatten().cloned());
    signals.extend(inputs.list_comparison_value_index.iter().cloned());
    signals.push(inputs.list_contains_comparison_value.clone());
    signals.extend(inputs.list_valid_values.iter().flatten().cloned());
    signals.push(inputs.global_watermark.clone());
    signals
}

/// Convenience used by padding and sentinel logic: an `i64` lifted into
/// the field the way the public signal vector lifts it.
pub fn numeric_signal(value: i64) -> CircuitSignal {
    i64_to_field(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpc_core::field_neg_one;
    use num_traits::Zero;

    fn sig(v: u32) -> CircuitSignal {
        CircuitSignal::from(v)
    }

    fn sample_inputs() -> CircuitInputs {
        CircuitInputs {
            object_content_id: vec![sig(11)],
            object_signer_pubkey_ax: vec![sig(12)],
            object_signer_pubkey_ay: vec![sig(13)],
            object_signature_r8x: vec![sig(14)],
            object_signature_r8y: vec![sig(15)],
            object_signature_s: vec![sig(16)],
            entry_object_index: vec![sig(0), sig(0)],
            entry_name_hash: vec![sig(21), sig(22)],
            entry_is_value_hash_revealed: sig(0b01),
            entry_proof_depth: vec![sig(2), sig(2)],
            entry_proof_index: vec![sig(0), sig(2)],
            entry_proof_siblings: vec![vec![sig(31), sig(32)], vec![sig(33), sig(34)]],
            virtual_entry_is_value_hash_revealed: sig(1),
            entry_equal_to_other_entry_by_index: vec![sig(0), sig(1), sig(2)],
            owner_entry_index: field_neg_one().clone(),
            owner_identity_nullifier: sig(0),
            owner_identity_trapdoor: sig(0),
            owner_external_nullifier: sig(0),
            owner_is_nullifier_hash_revealed: sig(0),
            numeric_values: vec![5],
            numeric_value_entry_indices: vec![sig(1)],
            numeric_min_values: vec![-10],
            numeric_max_values: vec![10],
            tuple_indices: vec![vec![sig(0), sig(1)]],
            list_comparison_value_index: vec![sig(3)],
            list_contains_comparison_value: sig(1),
            list_valid_values: vec![vec![sig(41), sig(42)]],
            global_watermark: sig(99),
        }
    }

    #[test]
    fn test_filter_public_inputs_drops_private_signals() {
        let inputs = sample_inputs();
        let public = filter_public_inputs(&inputs);
        assert_eq!(public.entry_name_hash, inputs.entry_name_hash);
        assert_eq!(public.global_watermark, inputs.global_watermark);
        // A signal vector built from the filtered set carries no trace of
        // the private object or proof signals.
        let outputs = CircuitOutputs {
            entry_revealed_value_hash: vec![sig(1), sig(2)],
            virtual_entry_revealed_value_hash: vec![sig(3)],
            owner_revealed_nullifier_hash: sig(4),
        };
        let signals = make_public_signals(&public, &outputs);
        assert!(!signals.contains(&sig(31)));
        assert!(!signals.contains(&sig(16)));
    }

    #[test]
    fn test_public_signal_ordering_starts_with_outputs() {
        let public = filter_public_inputs(&sample_inputs());
        let outputs = CircuitOutputs {
            entry_revealed_value_hash: vec![sig(101), sig(102)],
            virtual_entry_revealed_value_hash: vec![sig(103)],
            owner_revealed_nullifier_hash: sig(104),
        };
        let signals = make_public_signals(&public, &outputs);
        assert_eq!(&signals[..4], &[sig(101), sig(102), sig(103), sig(104)]);
        // Then the entry object indices and name hashes.
        assert_eq!(&signals[4..6], &[sig(0), sig(0)]);
        assert_eq!(&signals[6..8], &[sig(21), sig(22)]);
        // The watermark closes the vector.
        assert_eq!(signals.last(), Some(&sig(99)));
    }

    #[test]
    fn test_negative_bounds_are_residue_normalized() {
        let public = filter_public_inputs(&sample_inputs());
        let outputs = CircuitOutputs {
            entry_revealed_value_hash: vec![sig(0), sig(0)],
            virtual_entry_revealed_value_hash: vec![sig(0)],
            owner_revealed_nullifier_hash: sig(0),
        };
        let signals = make_public_signals(&public, &outputs);
        let expected = field_modulus() - 10u8;
        assert!(
            signals.contains(&expected),
            "min bound -10 should appear as modulus - 10"
        );
    }

    #[test]
    fn test_outputs_roundtrip_through_signal_vector() {
        let public = filter_public_inputs(&sample_inputs());
        let outputs = CircuitOutputs {
            entry_revealed_value_hash: vec![sig(7), field_neg_one().clone()],
            virtual_entry_revealed_value_hash: vec![sig(8)],
            owner_revealed_nullifier_hash: field_neg_one().clone(),
        };
        let signals = make_public_signals(&public, &outputs);
        let back = outputs_from_public_signals(&signals, 2, 1).unwrap();
        assert_eq!(back, outputs);
    }

    #[test]
    fn test_outputs_from_short_vector_errors() {
        let result = outputs_from_public_signals(&[sig(1), sig(2)], 2, 1);
        assert!(matches!(
            result,
            Err(SignalLayoutError::TooShort { got: 2, need: 4 })
        ));
    }

    #[test]
    fn test_numeric_signal_lifts_negatives() {
        assert_eq!(numeric_signal(0), CircuitSignal::zero());
        assert_eq!(&numeric_signal(-1), field_neg_one());
    }
}
