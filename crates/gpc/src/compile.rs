//! # Input Compilation — Config and Inputs to Circuit Signals
//!
//! Two compilation paths share one slot layout:
//!
//! - the prove side turns a configuration plus concrete inputs into the
//!   full [`CircuitInputs`] a backend consumes, and
//! - the verify side rebuilds the public inputs and outputs purely from
//!   a bound configuration and claims, never from a live proof run.
//!
//! Everything public is produced by [`ConfigLayout`] methods used by
//! both paths, so the two sides cannot drift: same slot assignment, same
//! padding, same sentinels.
//!
//! ## Padding Policy
//!
//! Unused slots up to the circuit's fixed widths are padded by repeating
//! the first real element (content-stable: padded signals carry no
//! distinguishing information and repeated calls are deterministic).
//! Where no real element exists at all, disabled index slots carry the
//! sentinel `modulus - 1` and data slots carry zeros.

use std::collections::BTreeMap;

use gpc_circuits::family::CircuitDesc;
use gpc_circuits::params::GpcCircuitParams;
use gpc_circuits::signals::{CircuitInputs, CircuitOutputs, CircuitPublicInputs, CircuitSignal};
use gpc_circuits::tuple::compute_tuple_indices;
use gpc_circuits::tuple::hash_tuple;
use gpc_core::{field_neg_one, PodName};
use gpc_crypto::field_hash::{entry_name_hash, public_key_hash};
use gpc_pod::PodValue;
use num_bigint::BigUint;
use num_traits::Zero;

use crate::canon::make_watermark_signal;
use crate::error::{GpcError, GpcResolutionError, GpcValueError};
use crate::types::{
    EntryRef, GpcBoundConfig, GpcProofConfig, GpcProofEntryConfig, GpcProofInputs,
    GpcRevealedClaims, MembershipList, PodEntryIdentifier,
};

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// One real entry slot.
pub(crate) struct EntrySlot {
    /// Index of the owning POD in canonical pod order.
    pub pod_index: usize,
    pub pod: PodName,
    pub entry: PodName,
    pub config: GpcProofEntryConfig,
}

/// One numeric bounds check.
pub(crate) struct NumericCheck {
    pub entry_slot: usize,
    pub min: i64,
    pub max: i64,
    pub pod: PodName,
    pub entry: PodName,
}

/// One membership (or non-membership) check.
pub(crate) struct ListCheck {
    pub list: PodName,
    pub comparison_index: usize,
    pub is_member: bool,
}

/// The slot assignment a configuration compiles to under a chosen
/// circuit. Pure function of (config, circuit parameters); both the
/// prove and verify paths build the same layout.
pub(crate) struct ConfigLayout {
    pub params: GpcCircuitParams,
    circuit_id: String,
    pub pods: Vec<PodName>,
    pub entry_slots: Vec<EntrySlot>,
    /// Effective reveal flag of each real pod's virtual signer entry.
    pub virtual_revealed: Vec<bool>,
    /// Combined-space slot of the first owner entry, if any.
    pub owner_slot: Option<usize>,
    /// Equality wiring over the combined entry + virtual space;
    /// unconstrained slots self-reference.
    pub equality: Vec<usize>,
    pub numeric_checks: Vec<NumericCheck>,
    /// Tuple index rows in combined space, chained to the circuit arity.
    pub tuple_rows: Vec<Vec<usize>>,
    pub list_checks: Vec<ListCheck>,
}

impl ConfigLayout {
    pub fn build(config: &GpcProofConfig, circuit: &CircuitDesc) -> Result<Self, GpcError> {
        let params = circuit.params;
        let circuit_id = format!("{}_{}", circuit.family, circuit.name);
        let too_small = |reason: String| {
            GpcError::Resolution(GpcResolutionError::CircuitTooSmall {
                circuit: circuit_id.clone(),
                reason,
            })
        };

        let pods: Vec<PodName> = config.pods.keys().cloned().collect();
        if pods.len() > params.max_objects {
            return Err(too_small(format!(
                "{} objects exceed capacity {}",
                pods.len(),
                params.max_objects
            )));
        }

        let mut entry_slots = Vec::new();
        let mut slot_of_entry: BTreeMap<(PodName, PodName), usize> = BTreeMap::new();
        for (pod_index, (pod_name, pod_config)) in config.pods.iter().enumerate() {
            for (entry_name, entry_config) in &pod_config.entries {
                slot_of_entry
                    .insert((pod_name.clone(), entry_name.clone()), entry_slots.len());
                entry_slots.push(EntrySlot {
                    pod_index,
                    pod: pod_name.clone(),
                    entry: entry_name.clone(),
                    config: entry_config.clone(),
                });
            }
        }
        if entry_slots.len() > params.max_entries {
            return Err(too_small(format!(
                "{} entries exceed capacity {}",
                entry_slots.len(),
                params.max_entries
            )));
        }

        let pod_position: BTreeMap<&PodName, usize> =
            pods.iter().enumerate().map(|(i, name)| (name, i)).collect();
        let resolve = |reference: &PodEntryIdentifier| -> Result<usize, GpcError> {
            let dangling =
                || GpcResolutionError::DanglingEntryRef(reference.to_string());
            match &reference.entry {
                EntryRef::Entry(entry_name) => slot_of_entry
                    .get(&(reference.pod.clone(), entry_name.clone()))
                    .copied()
                    .ok_or_else(|| dangling().into()),
                EntryRef::SignerPublicKey => pod_position
                    .get(&reference.pod)
                    .map(|pos| params.max_entries + pos)
                    .ok_or_else(|| dangling().into()),
            }
        };

        let virtual_revealed: Vec<bool> = config
            .pods
            .values()
            .map(|pod| {
                pod.signer_public_key
                    .as_ref()
                    .map(|v| v.reveals())
                    .unwrap_or(true)
            })
            .collect();

        // Equality wiring: explicit constraints first, then secondary
        // owner entries chained to the first owner slot.
        let combined_len = params.max_entries + params.max_virtual_entries();
        let mut equality: Vec<usize> = (0..combined_len).collect();
        for (slot, entry) in entry_slots.iter().enumerate() {
            if let Some(reference) = &entry.config.equals_entry {
                equality[slot] = resolve(reference)?;
            }
        }
        for (pod_index, (_, pod_config)) in config.pods.iter().enumerate() {
            if let Some(virtual_config) = &pod_config.signer_public_key {
                if let Some(reference) = &virtual_config.equals_entry {
                    equality[params.max_entries + pod_index] = resolve(reference)?;
                }
            }
        }
        let owner_slots: Vec<usize> = entry_slots
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.config.is_owner())
            .map(|(slot, _)| slot)
            .collect();
        let owner_slot = owner_slots.first().copied();
        for slot in owner_slots.iter().skip(1) {
            equality[*slot] = owner_slots[0];
        }

        let numeric_checks: Vec<NumericCheck> = entry_slots
            .iter()
            .enumerate()
            .filter_map(|(slot, entry)| {
                entry.config.in_range.map(|range| NumericCheck {
                    entry_slot: slot,
                    min: range.min,
                    max: range.max,
                    pod: entry.pod.clone(),
                    entry: entry.entry.clone(),
                })
            })
            .collect();
        if numeric_checks.len() > params.max_numeric_values {
            return Err(too_small(format!(
                "{} numeric values exceed capacity {}",
                numeric_checks.len(),
                params.max_numeric_values
            )));
        }

        // Tuples occupy slots after the entry + virtual space, chained to
        // the circuit's native arity. A tuple's comparison value is its
        // final chain link.
        let tuple_base = combined_len;
        let mut tuple_rows: Vec<Vec<usize>> = Vec::new();
        let mut tuple_final_slot: BTreeMap<PodName, usize> = BTreeMap::new();
        for (tuple_name, tuple_config) in &config.tuples {
            let member_indices = tuple_config
                .entries
                .iter()
                .map(&resolve)
                .collect::<Result<Vec<usize>, GpcError>>()?;
            let rows = compute_tuple_indices(
                params.tuple_arity,
                tuple_base + tuple_rows.len(),
                &member_indices,
            );
            tuple_rows.extend(rows);
            tuple_final_slot.insert(tuple_name.clone(), tuple_base + tuple_rows.len() - 1);
        }
        if tuple_rows.len() > params.max_tuples {
            return Err(too_small(format!(
                "{} tuple slots exceed capacity {}",
                tuple_rows.len(),
                params.max_tuples
            )));
        }

        // Membership checks in canonical order: entry slots, then virtual
        // entries, then tuples; membership before non-membership.
        let mut list_checks = Vec::new();
        for (slot, entry) in entry_slots.iter().enumerate() {
            for (list, is_member) in [
                (&entry.config.is_member_of, true),
                (&entry.config.is_not_member_of, false),
            ] {
                if let Some(list) = list {
                    list_checks.push(ListCheck {
                        list: list.clone(),
                        comparison_index: slot,
                        is_member,
                    });
                }
            }
        }
        for (pod_index, (_, pod_config)) in config.pods.iter().enumerate() {
            if let Some(virtual_config) = &pod_config.signer_public_key {
                for (list, is_member) in [
                    (&virtual_config.is_member_of, true),
                    (&virtual_config.is_not_member_of, false),
                ] {
                    if let Some(list) = list {
                        list_checks.push(ListCheck {
                            list: list.clone(),
                            comparison_index: params.max_entries + pod_index,
                            is_member,
                        });
                    }
                }
            }
        }
        for (tuple_name, tuple_config) in &config.tuples {
            for (list, is_member) in [
                (&tuple_config.is_member_of, true),
                (&tuple_config.is_not_member_of, false),
            ] {
                if let Some(list) = list {
                    list_checks.push(ListCheck {
                        list: list.clone(),
                        comparison_index: tuple_final_slot[tuple_name],
                        is_member,
                    });
                }
            }
        }
        if list_checks.len() > params.max_lists {
            return Err(too_small(format!(
                "{} membership lists exceed capacity {}",
                list_checks.len(),
                params.max_lists
            )));
        }

        Ok(Self {
            params,
            circuit_id,
            pods,
            entry_slots,
            virtual_revealed,
            owner_slot,
            equality,
            numeric_checks,
            tuple_rows,
            list_checks,
        })
    }

    fn too_small(&self, reason: String) -> GpcError {
        GpcError::Resolution(GpcResolutionError::CircuitTooSmall {
            circuit: self.circuit_id.clone(),
            reason,
        })
    }

    // -- Shared public-input arrays ----------------------------------------

    pub fn entry_object_index_signals(&self) -> Vec<CircuitSignal> {
        pad_repeat_first(
            self.entry_slots
                .iter()
                .map(|slot| signal(slot.pod_index))
                .collect(),
            self.params.max_entries,
        )
    }

    pub fn entry_name_hash_signals(&self) -> Vec<CircuitSignal> {
        pad_repeat_first(
            self.entry_slots
                .iter()
                .map(|slot| entry_name_hash(slot.entry.as_str()))
                .collect(),
            self.params.max_entries,
        )
    }

    /// Packed reveal bits over entry slots; padding slots are hidden.
    pub fn entry_reveal_bits(&self) -> CircuitSignal {
        pack_bits(
            (0..self.params.max_entries).map(|slot| {
                self.entry_slots
                    .get(slot)
                    .map(|entry| entry.config.reveals())
                    .unwrap_or(false)
            }),
        )
    }

    /// Packed reveal bits over virtual slots; padding repeats pod 0's bit.
    pub fn virtual_reveal_bits(&self) -> CircuitSignal {
        let first = self.virtual_revealed.first().copied().unwrap_or(false);
        pack_bits((0..self.params.max_virtual_entries()).map(|slot| {
            self.virtual_revealed.get(slot).copied().unwrap_or(first)
        }))
    }

    pub fn equality_signals(&self) -> Vec<CircuitSignal> {
        self.equality.iter().map(|&index| signal(index)).collect()
    }

    pub fn owner_index_signal(&self) -> CircuitSignal {
        self.owner_slot
            .map(signal)
            .unwrap_or_else(|| field_neg_one().clone())
    }

    pub fn numeric_index_signals(&self) -> Vec<CircuitSignal> {
        pad_or_sentinel(
            self.numeric_checks
                .iter()
                .map(|check| signal(check.entry_slot))
                .collect(),
            self.params.max_numeric_values,
        )
    }

    pub fn numeric_bound_arrays(&self) -> (Vec<i64>, Vec<i64>) {
        let mins = pad_repeat_first_or(
            self.numeric_checks.iter().map(|c| c.min).collect(),
            self.params.max_numeric_values,
            0,
        );
        let maxs = pad_repeat_first_or(
            self.numeric_checks.iter().map(|c| c.max).collect(),
            self.params.max_numeric_values,
            0,
        );
        (mins, maxs)
    }

    pub fn tuple_index_signals(&self) -> Vec<Vec<CircuitSignal>> {
        let rows: Vec<Vec<CircuitSignal>> = self
            .tuple_rows
            .iter()
            .map(|row| row.iter().map(|&index| signal(index)).collect())
            .collect();
        let filler = rows
            .first()
            .cloned()
            .unwrap_or_else(|| vec![CircuitSignal::zero(); self.params.tuple_arity]);
        let mut padded = rows;
        padded.resize(self.params.max_tuples, filler);
        padded
    }

    /// The three list signal arrays, hashed and padded from whichever
    /// side's lists are in hand (inputs when proving, claims when
    /// verifying).
    pub fn list_signal_arrays(
        &self,
        lists: &BTreeMap<PodName, MembershipList>,
    ) -> Result<ListSignals, GpcError> {
        let mut comparison_index = Vec::new();
        let mut bits = Vec::new();
        let mut valid_values = Vec::new();
        for check in &self.list_checks {
            let list = lists
                .get(&check.list)
                .ok_or_else(|| GpcResolutionError::MissingList(check.list.to_string()))?;
            if list.len() > self.params.max_list_elements {
                return Err(self.too_small(format!(
                    "list {} with {} elements exceeds capacity {}",
                    check.list,
                    list.len(),
                    self.params.max_list_elements
                )));
            }
            let hashed = hash_membership_list(list, self.params.tuple_arity)
                .ok_or_else(|| GpcValueError::MixedList(check.list.to_string()))?;
            comparison_index.push(signal(check.comparison_index));
            bits.push(check.is_member);
            valid_values.push(pad_repeat_first(hashed, self.params.max_list_elements));
        }

        let first_bit = bits.first().copied().unwrap_or(true);
        let contains_bits = pack_bits(
            (0..self.params.max_lists).map(|slot| bits.get(slot).copied().unwrap_or(first_bit)),
        );
        let index_filler = comparison_index
            .first()
            .cloned()
            .unwrap_or_else(|| field_neg_one().clone());
        comparison_index.resize(self.params.max_lists, index_filler);
        let values_filler = valid_values
            .first()
            .cloned()
            .unwrap_or_else(|| vec![CircuitSignal::zero(); self.params.max_list_elements]);
        valid_values.resize(self.params.max_lists, values_filler);

        Ok(ListSignals {
            comparison_index,
            contains_bits,
            valid_values,
        })
    }
}

/// The list membership signal arrays.
pub(crate) struct ListSignals {
    pub comparison_index: Vec<CircuitSignal>,
    pub contains_bits: CircuitSignal,
    pub valid_values: Vec<Vec<CircuitSignal>>,
}

/// Hash every element of a membership list to a field element: value
/// hashes for single values, chained tuple hashes for tuples. `None` for
/// a malformed (mixed/ragged) list.
pub(crate) fn hash_membership_list(
    list: &MembershipList,
    tuple_arity: usize,
) -> Option<Vec<BigUint>> {
    list.shape()?;
    let hashed = match list {
        MembershipList::Values(values) => {
            values.iter().map(PodValue::content_hash).collect()
        }
        MembershipList::Tuples(tuples) => tuples
            .iter()
            .map(|tuple| {
                let member_hashes: Vec<BigUint> =
                    tuple.iter().map(PodValue::content_hash).collect();
                hash_tuple(tuple_arity, &member_hashes)
            })
            .collect(),
    };
    Some(hashed)
}

// ---------------------------------------------------------------------------
// Prove-side compilation
// ---------------------------------------------------------------------------

/// Compile a configuration and concrete inputs into the full signal set
/// for the chosen circuit.
pub(crate) fn compile_prove_inputs(
    config: &GpcProofConfig,
    inputs: &GpcProofInputs,
    circuit: &CircuitDesc,
) -> Result<CircuitInputs, GpcError> {
    let layout = ConfigLayout::build(config, circuit)?;
    let params = layout.params;

    // Object signals, padded by repeating object 0.
    let mut object_content_id = Vec::new();
    let mut object_signer_pubkey_ax = Vec::new();
    let mut object_signer_pubkey_ay = Vec::new();
    let mut object_signature_r8x = Vec::new();
    let mut object_signature_r8y = Vec::new();
    let mut object_signature_s = Vec::new();
    for pod_name in &layout.pods {
        let pod = inputs
            .pods
            .get(pod_name)
            .ok_or_else(|| GpcResolutionError::MissingPod(pod_name.to_string()))?;
        if pod.merkle_depth() > params.merkle_max_depth {
            return Err(layout.too_small(format!(
                "POD {} needs merkle depth {}, capacity is {}",
                pod_name,
                pod.merkle_depth(),
                params.merkle_max_depth
            )));
        }
        let (ax, ay) = pod.signer_public_key().to_limbs();
        let (r8x, r8y, s) = pod.signature().to_limbs();
        object_content_id.push(pod.content_id().clone());
        object_signer_pubkey_ax.push(ax);
        object_signer_pubkey_ay.push(ay);
        object_signature_r8x.push(r8x);
        object_signature_r8y.push(r8y);
        object_signature_s.push(s);
    }
    for signals in [
        &mut object_content_id,
        &mut object_signer_pubkey_ax,
        &mut object_signer_pubkey_ay,
        &mut object_signature_r8x,
        &mut object_signature_r8y,
        &mut object_signature_s,
    ] {
        *signals = pad_repeat_first(std::mem::take(signals), params.max_objects);
    }

    // Entry proof signals, padded by repeating entry 0.
    let mut entry_proof_depth = Vec::new();
    let mut entry_proof_index = Vec::new();
    let mut entry_proof_siblings = Vec::new();
    for slot in &layout.entry_slots {
        let pod = &inputs.pods[&slot.pod];
        let proof = pod.entry_proof(&slot.entry)?;
        entry_proof_depth.push(signal(proof.depth));
        entry_proof_index.push(CircuitSignal::from(proof.index));
        let mut siblings = proof.siblings;
        siblings.resize(params.merkle_max_depth, CircuitSignal::zero());
        entry_proof_siblings.push(siblings);
    }
    entry_proof_depth = pad_repeat_first(entry_proof_depth, params.max_entries);
    entry_proof_index = pad_repeat_first(entry_proof_index, params.max_entries);
    entry_proof_siblings = pad_repeat_first(entry_proof_siblings, params.max_entries);

    // Owner module.
    let (owner_nullifier, owner_trapdoor, owner_external_nullifier, owner_reveal) =
        match (&layout.owner_slot, &inputs.owner) {
            (Some(_), Some(owner)) => (
                owner.identity.nullifier().clone(),
                owner.identity.trapdoor().clone(),
                make_watermark_signal(owner.external_nullifier.as_ref()),
                owner.external_nullifier.is_some(),
            ),
            (None, None) => (
                CircuitSignal::zero(),
                CircuitSignal::zero(),
                CircuitSignal::zero(),
                false,
            ),
            (Some(_), None) => return Err(GpcResolutionError::MissingOwner.into()),
            (None, Some(_)) => return Err(GpcResolutionError::UnusedOwner.into()),
        };

    // Numeric values (private side of the bounds checks).
    let mut numeric_values = Vec::new();
    for check in &layout.numeric_checks {
        let value = inputs.pods[&check.pod]
            .get(&check.entry)
            .and_then(PodValue::as_int)
            .ok_or_else(|| {
                GpcValueError::RangeOnNonInt(format!("{}.{}", check.pod, check.entry))
            })?;
        numeric_values.push(value);
    }
    let numeric_values =
        pad_repeat_first_or(numeric_values, params.max_numeric_values, 0);
    let (numeric_min_values, numeric_max_values) = layout.numeric_bound_arrays();

    let lists = layout.list_signal_arrays(&inputs.membership_lists)?;

    Ok(CircuitInputs {
        object_content_id,
        object_signer_pubkey_ax,
        object_signer_pubkey_ay,
        object_signature_r8x,
        object_signature_r8y,
        object_signature_s,
        entry_object_index: layout.entry_object_index_signals(),
        entry_name_hash: layout.entry_name_hash_signals(),
        entry_is_value_hash_revealed: layout.entry_reveal_bits(),
        entry_proof_depth,
        entry_proof_index,
        entry_proof_siblings,
        virtual_entry_is_value_hash_revealed: layout.virtual_reveal_bits(),
        entry_equal_to_other_entry_by_index: layout.equality_signals(),
        owner_entry_index: layout.owner_index_signal(),
        owner_identity_nullifier: owner_nullifier,
        owner_identity_trapdoor: owner_trapdoor,
        owner_external_nullifier,
        owner_is_nullifier_hash_revealed: CircuitSignal::from(u8::from(owner_reveal)),
        numeric_values,
        numeric_value_entry_indices: layout.numeric_index_signals(),
        numeric_min_values,
        numeric_max_values,
        tuple_indices: layout.tuple_index_signals(),
        list_comparison_value_index: lists.comparison_index,
        list_contains_comparison_value: lists.contains_bits,
        list_valid_values: lists.valid_values,
        global_watermark: make_watermark_signal(inputs.watermark.as_ref()),
    })
}

// ---------------------------------------------------------------------------
// Verify-side compilation
// ---------------------------------------------------------------------------

/// Rebuild the public inputs and outputs purely from a bound
/// configuration and claims. No POD or proof run is consulted; this is
/// what the claimed public signal vector is reconstructed from.
pub(crate) fn compile_verify_data(
    bound: &GpcBoundConfig,
    claims: &GpcRevealedClaims,
    circuit: &CircuitDesc,
) -> Result<(CircuitPublicInputs, CircuitOutputs), GpcError> {
    let config = bound.to_proof_config();
    let layout = ConfigLayout::build(&config, circuit)?;
    let params = layout.params;

    let (owner_external_nullifier, owner_reveal) = match &claims.owner {
        Some(owner) => (
            make_watermark_signal(Some(&owner.external_nullifier)),
            true,
        ),
        None => (CircuitSignal::zero(), false),
    };

    let lists = layout.list_signal_arrays(&claims.membership_lists)?;
    let (numeric_min_values, numeric_max_values) = layout.numeric_bound_arrays();

    let public_inputs = CircuitPublicInputs {
        entry_object_index: layout.entry_object_index_signals(),
        entry_name_hash: layout.entry_name_hash_signals(),
        entry_is_value_hash_revealed: layout.entry_reveal_bits(),
        virtual_entry_is_value_hash_revealed: layout.virtual_reveal_bits(),
        entry_equal_to_other_entry_by_index: layout.equality_signals(),
        owner_entry_index: layout.owner_index_signal(),
        owner_external_nullifier,
        owner_is_nullifier_hash_revealed: CircuitSignal::from(u8::from(owner_reveal)),
        numeric_value_entry_indices: layout.numeric_index_signals(),
        numeric_min_values,
        numeric_max_values,
        tuple_indices: layout.tuple_index_signals(),
        list_comparison_value_index: lists.comparison_index,
        list_contains_comparison_value: lists.contains_bits,
        list_valid_values: lists.valid_values,
        global_watermark: make_watermark_signal(claims.watermark.as_ref()),
    };

    // Outputs: revealed hashes from claimed values, sentinel elsewhere.
    let mut entry_revealed_value_hash = Vec::with_capacity(params.max_entries);
    for slot in &layout.entry_slots {
        if slot.config.reveals() {
            let value = claims
                .pods
                .get(&slot.pod)
                .and_then(|pod| pod.entries.as_ref())
                .and_then(|entries| entries.get(&slot.entry))
                .ok_or_else(|| {
                    GpcResolutionError::MissingRevealedEntry(format!(
                        "{}.{}",
                        slot.pod, slot.entry
                    ))
                })?;
            entry_revealed_value_hash.push(value.content_hash());
        } else {
            entry_revealed_value_hash.push(field_neg_one().clone());
        }
    }
    entry_revealed_value_hash.resize(params.max_entries, field_neg_one().clone());

    let mut virtual_entry_revealed_value_hash = Vec::with_capacity(params.max_virtual_entries());
    for (pod_index, pod_name) in layout.pods.iter().enumerate() {
        if layout.virtual_revealed[pod_index] {
            let key = claims
                .pods
                .get(pod_name)
                .and_then(|pod| pod.signer_public_key.as_ref())
                .ok_or_else(|| {
                    GpcResolutionError::MissingSignerKey(pod_name.to_string())
                })?;
            virtual_entry_revealed_value_hash.push(public_key_hash(key.as_bytes()));
        } else {
            virtual_entry_revealed_value_hash.push(field_neg_one().clone());
        }
    }
    // Padding object slots repeat object 0's signals, so their virtual
    // outputs repeat pod 0's revealed hash (or sentinel).
    let virtual_filler = virtual_entry_revealed_value_hash
        .first()
        .cloned()
        .unwrap_or_else(|| field_neg_one().clone());
    virtual_entry_revealed_value_hash.resize(params.max_virtual_entries(), virtual_filler);

    let owner_revealed_nullifier_hash = match &claims.owner {
        Some(owner) => owner.nullifier_hash.clone(),
        None => field_neg_one().clone(),
    };

    let outputs = CircuitOutputs {
        entry_revealed_value_hash,
        virtual_entry_revealed_value_hash,
        owner_revealed_nullifier_hash,
    };
    Ok((public_inputs, outputs))
}

// ---------------------------------------------------------------------------
// Small helpers
// ---------------------------------------------------------------------------

fn signal(index: usize) -> CircuitSignal {
    CircuitSignal::from(index)
}

fn pack_bits(bits: impl Iterator<Item = bool>) -> CircuitSignal {
    let mut packed = CircuitSignal::zero();
    for (position, bit) in bits.enumerate() {
        if bit {
            packed.set_bit(position as u64, true);
        }
    }
    packed
}

fn pad_repeat_first<T: Clone>(mut values: Vec<T>, width: usize) -> Vec<T> {
    let filler = values.first().cloned();
    if let Some(filler) = filler {
        values.resize(width, filler);
    }
    values
}

fn pad_repeat_first_or<T: Clone>(mut values: Vec<T>, width: usize, fallback: T) -> Vec<T> {
    let filler = values.first().cloned().unwrap_or(fallback);
    values.resize(width, filler);
    values
}

fn pad_or_sentinel(mut values: Vec<CircuitSignal>, width: usize) -> Vec<CircuitSignal> {
    let filler = values
        .first()
        .cloned()
        .unwrap_or_else(|| field_neg_one().clone());
    values.resize(width, filler);
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GpcProofObjectConfig, GpcProofTupleConfig};
    use gpc_circuits::family::CircuitFamily;

    fn name(s: &str) -> PodName {
        PodName::new(s).unwrap()
    }

    fn circuit(index: usize) -> CircuitDesc {
        CircuitFamily::proto_pod_gpc().circuits()[index].clone()
    }

    fn two_entry_config() -> GpcProofConfig {
        let mut entries = BTreeMap::new();
        entries.insert(
            name("a"),
            GpcProofEntryConfig {
                is_revealed: Some(true),
                ..Default::default()
            },
        );
        entries.insert(name("b"), GpcProofEntryConfig::default());
        let mut pods = BTreeMap::new();
        pods.insert(name("pod1"), GpcProofObjectConfig {
            entries,
            signer_public_key: None,
        });
        GpcProofConfig {
            pods,
            ..Default::default()
        }
    }

    #[test]
    fn test_layout_assigns_sorted_slots() {
        let layout = ConfigLayout::build(&two_entry_config(), &circuit(1)).unwrap();
        assert_eq!(layout.entry_slots.len(), 2);
        assert_eq!(layout.entry_slots[0].entry, name("a"));
        assert_eq!(layout.entry_slots[1].entry, name("b"));
        assert_eq!(layout.pods, vec![name("pod1")]);
    }

    #[test]
    fn test_layout_rejects_overflowing_entries() {
        // Circuit 0 fits a single entry.
        let result = ConfigLayout::build(&two_entry_config(), &circuit(0));
        assert!(matches!(
            result,
            Err(GpcError::Resolution(GpcResolutionError::CircuitTooSmall { .. }))
        ));
    }

    #[test]
    fn test_reveal_bits_pack_in_slot_order() {
        let layout = ConfigLayout::build(&two_entry_config(), &circuit(1)).unwrap();
        // Slot 0 (entry "a") revealed, slot 1 hidden, padding hidden.
        assert_eq!(layout.entry_reveal_bits(), CircuitSignal::from(0b1u8));
    }

    #[test]
    fn test_equality_defaults_to_self_reference() {
        let layout = ConfigLayout::build(&two_entry_config(), &circuit(1)).unwrap();
        let expected: Vec<usize> =
            (0..circuit(1).params.max_entries + circuit(1).params.max_objects).collect();
        assert_eq!(layout.equality, expected);
    }

    #[test]
    fn test_equality_resolves_reference() {
        let mut config = two_entry_config();
        config
            .pods
            .get_mut(&name("pod1"))
            .unwrap()
            .entries
            .get_mut(&name("b"))
            .unwrap()
            .equals_entry = Some(PodEntryIdentifier::entry(name("pod1"), name("a")));
        let layout = ConfigLayout::build(&config, &circuit(1)).unwrap();
        assert_eq!(layout.equality[1], 0);
    }

    #[test]
    fn test_signer_key_reference_resolves_to_virtual_slot() {
        let mut config = two_entry_config();
        config
            .pods
            .get_mut(&name("pod1"))
            .unwrap()
            .entries
            .get_mut(&name("b"))
            .unwrap()
            .equals_entry = Some(PodEntryIdentifier::signer_public_key(name("pod1")));
        let layout = ConfigLayout::build(&config, &circuit(1)).unwrap();
        // Virtual slot of pod 0 sits at max_entries.
        assert_eq!(layout.equality[1], circuit(1).params.max_entries);
    }

    #[test]
    fn test_secondary_owner_entries_chain_to_first() {
        let mut config = two_entry_config();
        {
            let pod = config.pods.get_mut(&name("pod1")).unwrap();
            pod.entries.get_mut(&name("b")).unwrap().is_owner_id = Some(true);
        }
        let mut entries2 = BTreeMap::new();
        entries2.insert(
            name("attendee"),
            GpcProofEntryConfig {
                is_owner_id: Some(true),
                ..Default::default()
            },
        );
        config.pods.insert(name("pod2"), GpcProofObjectConfig {
            entries: entries2,
            signer_public_key: None,
        });
        let layout = ConfigLayout::build(&config, &circuit(2)).unwrap();
        // Slots: pod1.a = 0, pod1.b = 1 (owner), pod2.attendee = 2 (owner).
        assert_eq!(layout.owner_slot, Some(1));
        assert_eq!(layout.equality[2], 1);
    }

    #[test]
    fn test_tuple_rows_allocated_after_virtual_space() {
        let mut config = two_entry_config();
        config.tuples.insert(
            name("tuple1"),
            GpcProofTupleConfig {
                entries: vec![
                    PodEntryIdentifier::entry(name("pod1"), name("a")),
                    PodEntryIdentifier::entry(name("pod1"), name("b")),
                ],
                is_member_of: Some(name("list1")),
                is_not_member_of: None,
            },
        );
        let desc = circuit(2);
        let layout = ConfigLayout::build(&config, &desc).unwrap();
        assert_eq!(layout.tuple_rows.len(), 1);
        // Members are entry slots 0 and 1, padded to arity 3.
        assert_eq!(layout.tuple_rows[0], vec![0, 1, 0]);
        // The comparison value is the tuple's final slot in combined space.
        let tuple_slot = desc.params.max_entries + desc.params.max_objects;
        assert_eq!(layout.list_checks[0].comparison_index, tuple_slot);
    }

    #[test]
    fn test_numeric_sentinel_when_no_bounds() {
        let layout = ConfigLayout::build(&two_entry_config(), &circuit(1)).unwrap();
        let indices = layout.numeric_index_signals();
        assert_eq!(indices.len(), circuit(1).params.max_numeric_values);
        for index in indices {
            assert_eq!(&index, field_neg_one());
        }
    }

    #[test]
    fn test_list_arrays_pad_by_repeating_first_element() {
        let mut config = two_entry_config();
        config
            .pods
            .get_mut(&name("pod1"))
            .unwrap()
            .entries
            .get_mut(&name("a"))
            .unwrap()
            .is_member_of = Some(name("allow"));
        let desc = circuit(1);
        let layout = ConfigLayout::build(&config, &desc).unwrap();
        let mut lists = BTreeMap::new();
        lists.insert(
            name("allow"),
            MembershipList::Values(vec![PodValue::Int(5), PodValue::Int(6)]),
        );
        let signals = layout.list_signal_arrays(&lists).unwrap();
        let row = &signals.valid_values[0];
        assert_eq!(row.len(), desc.params.max_list_elements);
        assert_eq!(row[0], PodValue::Int(5).content_hash());
        assert_eq!(row[1], PodValue::Int(6).content_hash());
        // Every padding element repeats the first hashed element.
        for padded in &row[2..] {
            assert_eq!(padded, &row[0]);
        }
    }

    #[test]
    fn test_oversized_list_rejected() {
        let mut config = two_entry_config();
        config
            .pods
            .get_mut(&name("pod1"))
            .unwrap()
            .entries
            .get_mut(&name("a"))
            .unwrap()
            .is_member_of = Some(name("allow"));
        let desc = circuit(1);
        let layout = ConfigLayout::build(&config, &desc).unwrap();
        let oversized: Vec<PodValue> = (0..desc.params.max_list_elements as i64 + 1)
            .map(PodValue::Int)
            .collect();
        let mut lists = BTreeMap::new();
        lists.insert(name("allow"), MembershipList::Values(oversized));
        assert!(matches!(
            layout.list_signal_arrays(&lists),
            Err(GpcError::Resolution(GpcResolutionError::CircuitTooSmall { .. }))
        ));
    }
}
